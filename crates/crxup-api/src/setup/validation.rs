//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use crxup_core::ServerConfig;

/// Validate configuration values, failing fast on anything that would break requests.
pub fn validate_config(config: &ServerConfig) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.cors_origins.iter().any(|o| o == "*") {
            tracing::warn!(
                "CORS configured to allow all origins (*) in production; read endpoints are public"
            );
        }

        if config.uploads_enabled() {
            tracing::warn!(
                "Uploads are enabled in production and are not authenticated; restrict access to the upload route at the proxy"
            );
        }

        if config.public_base_url.starts_with("http://localhost") {
            tracing::warn!(
                public_base_url = %config.public_base_url,
                "PUBLIC_BASE_URL points at localhost in production; clients will receive unreachable download URLs"
            );
        }
    }

    for origin in config.cors_origins.iter().filter(|o| *o != "*") {
        if origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(anyhow::anyhow!("Invalid CORS origin '{}'", origin));
        }
    }

    Ok(())
}
