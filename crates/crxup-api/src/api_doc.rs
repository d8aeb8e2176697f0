//! OpenAPI documentation.
//! Handler annotations use the default `/pp-ext` prefix; it is rewritten at runtime to the
//! configured route prefix.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crxup_core::{UpdateManifest, VersionEntry, VersionListing};

/// Prefix used in handler path annotations (utoipa requires compile-time literals).
const OPENAPI_PREFIX_PLACEHOLDER: &str = "/pp-ext";

/// Rewrites path keys carrying the placeholder prefix to `route_prefix`.
fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, route_prefix: &str) {
    if OPENAPI_PREFIX_PLACEHOLDER == route_prefix {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = match key.strip_prefix(OPENAPI_PREFIX_PLACEHOLDER) {
            Some(rest) if rest.starts_with('/') => format!("{}{}", route_prefix, rest),
            _ => key,
        };
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with paths under the configured route prefix. The upload
/// path is dropped when uploads are not mounted.
pub fn get_openapi_spec(route_prefix: &str, uploads_enabled: bool) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, route_prefix);
    if !uploads_enabled {
        spec.paths.paths.remove(&format!("{}/upload", route_prefix));
    }
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "crxup Update Server",
        version = "0.1.0",
        description = "Self-hosted update server for a browser extension: version listing, gupdate update descriptors, archive upload and download."
    ),
    paths(
        handlers::versions::get_versions,
        handlers::update_xml::get_update_xml,
        handlers::update_manifest::get_update_manifest,
        handlers::upload::upload_extension,
        handlers::artifact::download_artifact,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        VersionListing,
        VersionEntry,
        UpdateManifest,
        handlers::upload::UploadResponse,
        handlers::upload::UploadForm,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "versions", description = "Published archives"),
        (name = "updates", description = "Auto-update descriptors"),
        (name = "health", description = "Liveness and readiness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_is_kept() {
        let spec = get_openapi_spec("/pp-ext", true);
        assert!(spec.paths.paths.contains_key("/pp-ext/update.xml"));
        assert!(spec.paths.paths.contains_key("/health"));
    }

    #[test]
    fn test_paths_follow_configured_prefix() {
        let spec = get_openapi_spec("/updates/chrome", true);
        assert!(spec.paths.paths.contains_key("/updates/chrome/versions"));
        assert!(spec.paths.paths.contains_key("/updates/chrome/{filename}"));
        assert!(!spec.paths.paths.contains_key("/pp-ext/versions"));
        assert!(spec.paths.paths.contains_key("/health/ready"));
    }

    #[test]
    fn test_empty_prefix_mounts_at_root() {
        let spec = get_openapi_spec("", true);
        assert!(spec.paths.paths.contains_key("/update.xml"));
    }

    #[test]
    fn test_upload_path_hidden_without_uploads() {
        let spec = get_openapi_spec("/pp-ext", false);
        assert!(!spec.paths.paths.contains_key("/pp-ext/upload"));
        assert!(spec.paths.paths.contains_key("/pp-ext/versions"));
    }
}
