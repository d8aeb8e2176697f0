//! Release directory handling: picking the newest archive and static publishing.

use anyhow::{anyhow, Context, Result};
use crxup_core::config::normalize_route_prefix;
use crxup_core::naming::{DEFAULT_ARCHIVE_PREFIX, DEFAULT_ARCHIVE_SUFFIX};
use crxup_core::{ArchiveNaming, CatalogSettings, VersionedArtifact};
use bytes::Bytes;
use crxup_storage::{list_artifacts, LocalStorage, Storage};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_RELEASE_DIR: &str = "../pp-extension/release";
pub const DEFAULT_ROUTE_PREFIX: &str = "/pp-ext";

/// CLI settings resolved from the environment.
#[derive(Clone, Debug)]
pub struct CliSettings {
    pub server_url: String,
    pub release_dir: PathBuf,
    pub route_prefix: String,
    pub naming: ArchiveNaming,
}

impl CliSettings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let naming = ArchiveNaming::new(
            var("ARCHIVE_PREFIX").unwrap_or_else(|| DEFAULT_ARCHIVE_PREFIX.to_string()),
            var("ARCHIVE_SUFFIX").unwrap_or_else(|| DEFAULT_ARCHIVE_SUFFIX.to_string()),
        )
        .map_err(|e| anyhow!("{}", e))?;

        Ok(Self {
            server_url: var("UPDATE_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            release_dir: PathBuf::from(
                var("EXTENSION_PATH").unwrap_or_else(|| DEFAULT_RELEASE_DIR.to_string()),
            ),
            route_prefix: normalize_route_prefix(
                &var("ROUTE_PREFIX").unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string()),
            ),
            naming,
        })
    }

    /// Catalog settings for a local directory, with URLs rooted at `base_url`.
    pub fn catalog_for(&self, dir: &Path, base_url: &str) -> CatalogSettings {
        CatalogSettings::new(dir, base_url, &self.route_prefix, self.naming.clone())
    }
}

/// Newest archive in `dir`, ordered by version like the server orders its catalog.
pub async fn latest_release(dir: &Path, settings: &CliSettings) -> Result<VersionedArtifact> {
    let catalog = list_artifacts(&settings.catalog_for(dir, &settings.server_url)).await;
    catalog.latest().cloned().ok_or_else(|| {
        anyhow!(
            "No extension archives found in {} (expected {})",
            dir.display(),
            settings.naming.describe()
        )
    })
}

/// Copy `artifact` into `public_dir`, creating it if needed. Returns the destination path.
///
/// Written through [`LocalStorage`], so a server reading `public_dir` never lists a
/// partially copied archive and an existing copy is replaced atomically.
pub async fn publish_static(artifact: &VersionedArtifact, public_dir: &Path) -> Result<PathBuf> {
    let storage = LocalStorage::new(public_dir)
        .await
        .with_context(|| format!("Failed to create {}", public_dir.display()))?;

    let data = tokio::fs::read(&artifact.location)
        .await
        .with_context(|| format!("Failed to read {}", artifact.location.display()))?;

    let dest = storage
        .upload(&artifact.filename, Bytes::from(data))
        .await
        .with_context(|| {
            format!(
                "Failed to copy {} into {}",
                artifact.location.display(),
                public_dir.display()
            )
        })?;

    tracing::info!(
        source = %artifact.location.display(),
        dest = %dest.display(),
        version = %artifact.version,
        "Published archive"
    );

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn settings_from(pairs: &[(&str, &str)]) -> CliSettings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliSettings::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings.server_url, "http://localhost:3000");
        assert_eq!(settings.release_dir, PathBuf::from("../pp-extension/release"));
        assert_eq!(settings.route_prefix, "/pp-ext");
    }

    #[tokio::test]
    async fn test_latest_release_uses_version_order() {
        let dir = tempdir().unwrap();
        for name in [
            "crx-pp-extension-9.0.0.zip",
            "crx-pp-extension-10.0.0.zip",
            "crx-pp-extension-notes.zip",
        ] {
            std::fs::write(dir.path().join(name), b"zip").unwrap();
        }

        let latest = latest_release(dir.path(), &settings_from(&[])).await.unwrap();
        assert_eq!(latest.filename, "crx-pp-extension-10.0.0.zip");
    }

    #[tokio::test]
    async fn test_latest_release_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(latest_release(dir.path(), &settings_from(&[])).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_static_copies_archive() {
        let release = tempdir().unwrap();
        let public = tempdir().unwrap();
        std::fs::write(release.path().join("crx-pp-extension-1.2.3.zip"), b"archive").unwrap();

        let settings = settings_from(&[]);
        let latest = latest_release(release.path(), &settings).await.unwrap();
        let target = public.path().join("pp-ext");
        let dest = publish_static(&latest, &target).await.unwrap();

        assert_eq!(dest, target.join("crx-pp-extension-1.2.3.zip"));
        assert_eq!(std::fs::read(dest).unwrap(), b"archive");
    }

    #[tokio::test]
    async fn test_publish_static_replaces_existing_copy() {
        let release = tempdir().unwrap();
        let public = tempdir().unwrap();
        std::fs::write(release.path().join("crx-pp-extension-1.2.3.zip"), b"rebuilt").unwrap();
        std::fs::write(public.path().join("crx-pp-extension-1.2.3.zip"), b"stale").unwrap();

        let latest = latest_release(release.path(), &settings_from(&[])).await.unwrap();
        publish_static(&latest, public.path()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(public.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["crx-pp-extension-1.2.3.zip".to_string()]);
        assert_eq!(
            std::fs::read(public.path().join("crx-pp-extension-1.2.3.zip")).unwrap(),
            b"rebuilt"
        );
    }
}
