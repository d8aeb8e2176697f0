pub mod artifact;
pub mod health;
pub mod update_manifest;
pub mod update_xml;
pub mod upload;
pub mod versions;

use serde::Deserialize;
use utoipa::IntoParams;

/// Extension id query: `?id=` or the `?appid=` alias.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExtensionIdQuery {
    /// Extension ID
    pub id: Option<String>,
    /// Alias for `id`
    pub appid: Option<String>,
}

impl ExtensionIdQuery {
    /// First non-blank of `id` then `appid`.
    pub fn extension_id(&self) -> Option<&str> {
        [self.id.as_deref(), self.appid.as_deref()]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
    }
}
