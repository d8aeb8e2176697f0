//! crxup core library
//!
//! Version discovery and update-descriptor generation for a browser-extension update
//! server: the archive naming convention, the ordered version catalog, the `gupdate`
//! descriptor builder, configuration and the shared error type.

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod naming;

// Re-export commonly used types
pub use catalog::{Catalog, VersionedArtifact};
pub use config::{CatalogSettings, DeploymentProfile, LogFormat, ServerConfig};
pub use descriptor::{
    build_manifest, list_versions, resolve_latest, UpdateDescriptor, UpdateManifest,
    VersionEntry, VersionListing,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use naming::ArchiveNaming;
