//! JSON update manifest handler

use super::ExtensionIdQuery;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use crxup_core::descriptor::require_extension_id;
use crxup_core::{build_manifest, UpdateManifest};
use crxup_storage::load_catalog;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/pp-ext/update-manifest.json",
    tag = "updates",
    params(ExtensionIdQuery),
    responses(
        (status = 200, description = "Update manifest", body = UpdateManifest),
        (status = 400, description = "Extension ID missing", body = ErrorResponse),
        (status = 404, description = "No versions available", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "update_manifest"))]
pub async fn get_update_manifest(
    Query(query): Query<ExtensionIdQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UpdateManifest>, HttpAppError> {
    let extension_id = require_extension_id(query.extension_id())?;
    let catalog = load_catalog(state.storage.as_ref(), &state.catalog).await;
    let manifest = build_manifest(&catalog, Some(extension_id), &state.catalog)?;
    Ok(Json(manifest))
}
