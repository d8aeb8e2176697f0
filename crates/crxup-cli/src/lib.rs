//! Publishing tools for the update server: upload, static publish, smoke check and
//! extension ID derivation.

pub mod client;
pub mod extension_id;
pub mod release;

pub use client::UpdateClient;
pub use extension_id::{extension_id_from_der, extension_id_from_key};
pub use release::{latest_release, publish_static, CliSettings};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
