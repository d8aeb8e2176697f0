//! Server startup and graceful shutdown

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use crxup_core::ServerConfig;
use crxup_storage::load_catalog;

/// Start the server with graceful shutdown
pub async fn start_server(config: &ServerConfig, state: &AppState, app: Router) -> Result<()> {
    let addr = format!("{}:{}", config.bind_address, config.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log_startup_report(state).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Log the public endpoints and the versions currently on disk.
pub async fn log_startup_report(state: &AppState) {
    let settings = &state.catalog;

    tracing::info!(
        profile = state.config.deployment_profile.as_str(),
        storage_dir = %settings.storage_directory.display(),
        versions_url = %settings.route_url("/versions"),
        update_url = %settings.route_url("/update.xml?id=YOUR_EXTENSION_ID"),
        manifest_url = %settings.route_url("/update-manifest.json?id=YOUR_EXTENSION_ID"),
        health_url = %format!("{}/health", settings.public_base_url),
        "Server ready and accepting connections"
    );

    if state.config.uploads_enabled() {
        tracing::info!(upload_url = %settings.route_url("/upload"), "Uploads enabled");
    }

    let catalog = load_catalog(state.storage.as_ref(), settings).await;
    match catalog.latest() {
        Some(latest) => {
            let versions: Vec<String> = catalog.iter().map(|a| a.version.to_string()).collect();
            tracing::info!(
                count = catalog.len(),
                latest = %latest.version,
                versions = %versions.join(", "),
                "Available versions"
            );
        }
        None => {
            tracing::warn!(
                expected = %settings.naming.describe(),
                "No extension versions found in storage directory"
            );
        }
    }
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM. If a handler cannot be installed that
/// signal source is ignored and the other one still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
