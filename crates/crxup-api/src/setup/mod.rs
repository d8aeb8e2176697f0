//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use crxup_core::ServerConfig;
use std::sync::Arc;

/// Initialize tracing, validate configuration, open storage and build the router.
pub async fn initialize_app(config: ServerConfig) -> Result<(Arc<AppState>, axum::Router)> {
    crxup_infra::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment,
        profile = config.deployment_profile.as_str(),
        "Configuration loaded and validated successfully"
    );

    let storage = crxup_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let state = Arc::new(AppState::new(config.clone(), storage)?);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
