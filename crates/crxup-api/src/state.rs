//! Application state shared by all handlers.

use crxup_core::{CatalogSettings, ServerConfig};
use crxup_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Derived from `config` once at startup.
    pub catalog: CatalogSettings,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: ServerConfig, storage: Arc<dyn Storage>) -> Result<Self, anyhow::Error> {
        let catalog = config
            .catalog_settings()
            .map_err(|e| anyhow::anyhow!("Invalid archive naming: {}", e))?;
        Ok(Self {
            config,
            catalog,
            storage,
        })
    }
}
