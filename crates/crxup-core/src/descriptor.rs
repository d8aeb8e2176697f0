//! Update descriptor builder
//!
//! Two read shapes over a [`Catalog`]: the version listing and the single-target update
//! pointer. The pointer is rendered in the Google Update (`gupdate`) response vocabulary
//! consumed by browser auto-update clients; its element and attribute names are fixed.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use semver::Version;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::{Catalog, VersionedArtifact};
use crate::config::CatalogSettings;
use crate::error::AppError;

pub const UPDATE_PROTOCOL_NAMESPACE: &str = "http://www.google.com/update2/response";
pub const UPDATE_PROTOCOL_VERSION: &str = "2.0";

pub const MISSING_EXTENSION_ID: &str = "Extension ID is required. Use ?id=YOUR_EXTENSION_ID";
pub const NO_VERSIONS_AVAILABLE: &str = "No versions available";

/// One row of the version listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionEntry {
    #[schema(example = "3.0.1")]
    pub version: String,
    #[schema(example = "http://localhost:3000/pp-ext/crx-pp-extension-3.0.1.zip")]
    pub url: String,
    #[schema(example = "crx-pp-extension-3.0.1.zip")]
    pub filename: String,
}

impl From<&VersionedArtifact> for VersionEntry {
    fn from(artifact: &VersionedArtifact) -> Self {
        Self {
            version: artifact.version.to_string(),
            url: artifact.download_url.clone(),
            filename: artifact.filename.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionListing {
    #[schema(example = "pp-extension")]
    pub extension: String,
    pub versions: Vec<VersionEntry>,
}

/// Every artifact in catalog order. An empty catalog is an empty listing, not an error.
pub fn list_versions(catalog: &Catalog, extension_name: &str) -> VersionListing {
    VersionListing {
        extension: extension_name.to_string(),
        versions: catalog.iter().map(VersionEntry::from).collect(),
    }
}

/// Validate the caller-supplied extension id. It is opaque; only absence is an error.
pub fn require_extension_id(extension_id: Option<&str>) -> Result<&str, AppError> {
    match extension_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(AppError::InvalidInput(MISSING_EXTENSION_ID.to_string())),
    }
}

/// Single-target update pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDescriptor {
    pub app_id: String,
    pub version: Version,
    pub codebase: String,
}

impl UpdateDescriptor {
    pub fn for_artifact(app_id: impl Into<String>, artifact: &VersionedArtifact) -> Self {
        Self {
            app_id: app_id.into(),
            version: artifact.version.clone(),
            codebase: artifact.download_url.clone(),
        }
    }

    /// Render the `gupdate` document with a UTF-8 prologue.
    pub fn to_xml(&self) -> Result<String, AppError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(render_error)?;

        let mut gupdate = BytesStart::new("gupdate");
        gupdate.push_attribute(("xmlns", UPDATE_PROTOCOL_NAMESPACE));
        gupdate.push_attribute(("protocol", UPDATE_PROTOCOL_VERSION));
        writer
            .write_event(Event::Start(gupdate))
            .map_err(render_error)?;

        let mut app = BytesStart::new("app");
        app.push_attribute(("appid", self.app_id.as_str()));
        writer.write_event(Event::Start(app)).map_err(render_error)?;

        let version = self.version.to_string();
        let mut updatecheck = BytesStart::new("updatecheck");
        updatecheck.push_attribute(("codebase", self.codebase.as_str()));
        updatecheck.push_attribute(("version", version.as_str()));
        writer
            .write_event(Event::Empty(updatecheck))
            .map_err(render_error)?;

        writer
            .write_event(Event::End(BytesEnd::new("app")))
            .map_err(render_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("gupdate")))
            .map_err(render_error)?;

        String::from_utf8(writer.into_inner()).map_err(render_error)
    }
}

fn render_error(err: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Failed to render update descriptor: {}", err))
}

/// Point `extension_id` at the newest artifact in `catalog`.
///
/// A missing id is rejected before the catalog is consulted; an empty catalog is
/// reported as not found.
pub fn resolve_latest(
    catalog: &Catalog,
    extension_id: Option<&str>,
) -> Result<UpdateDescriptor, AppError> {
    let extension_id = require_extension_id(extension_id)?;
    let latest = catalog
        .latest()
        .ok_or_else(|| AppError::NotFound(NO_VERSIONS_AVAILABLE.to_string()))?;
    Ok(UpdateDescriptor::for_artifact(extension_id, latest))
}

/// JSON companion of the XML descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateManifest {
    #[schema(example = "http://localhost:3000/pp-ext/update.xml?id=abcdefghijklmnopabcdefghijklmnop")]
    pub update_url: String,
    #[schema(example = "3.0.1")]
    pub latest_version: String,
    #[schema(example = "http://localhost:3000/pp-ext/crx-pp-extension-3.0.1.zip")]
    pub download_url: String,
}

pub fn build_manifest(
    catalog: &Catalog,
    extension_id: Option<&str>,
    settings: &CatalogSettings,
) -> Result<UpdateManifest, AppError> {
    let descriptor = resolve_latest(catalog, extension_id)?;
    Ok(UpdateManifest {
        update_url: settings.route_url(&format!(
            "/update.xml?id={}",
            urlencoding::encode(&descriptor.app_id)
        )),
        latest_version: descriptor.version.to_string(),
        download_url: descriptor.codebase,
    })
}
