//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p crxup-api`.

pub mod fixtures;

use axum_test::TestServer;
use crxup_api::setup::routes;
use crxup_api::state::AppState;
use crxup_core::ServerConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Base URL download links are built against.
pub const TEST_BASE_URL: &str = "http://updates.test";

/// Extension id used by descriptor tests.
pub const TEST_EXTENSION_ID: &str = "ext-id-x";

/// Test application: server and owned storage directory.
pub struct TestApp {
    pub server: TestServer,
    pub storage_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Write an archive straight into the storage directory.
    pub fn put_archive(&self, filename: &str) {
        fixtures::write_archive(&self.storage_dir, filename);
    }
}

/// Server profile app over a fresh temp directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// App with extra environment-style overrides (e.g. `("DEPLOYMENT_PROFILE", "static")`).
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let storage_dir = temp_dir.path().join("pp-ext");

    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "STORAGE_DIR".to_string(),
        storage_dir.to_string_lossy().into_owned(),
    );
    vars.insert("PUBLIC_BASE_URL".to_string(), TEST_BASE_URL.to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = ServerConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config");
    config.validate().expect("valid test config");

    let storage = crxup_storage::create_storage(&config)
        .await
        .expect("create storage");
    let state = Arc::new(AppState::new(config.clone(), storage).expect("app state"));
    let router = routes::setup_routes(&config, state).expect("router");

    TestApp {
        server: TestServer::new(router).expect("test server"),
        storage_dir,
        _temp_dir: temp_dir,
    }
}
