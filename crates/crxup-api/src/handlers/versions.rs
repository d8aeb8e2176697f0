//! Version listing handler

use crate::state::AppState;
use axum::{extract::State, Json};
use crxup_core::{list_versions, VersionListing};
use crxup_storage::load_catalog;
use std::sync::Arc;

/// List every available version, newest first.
#[utoipa::path(
    get,
    path = "/pp-ext/versions",
    tag = "versions",
    responses(
        (status = 200, description = "Available versions (possibly empty)", body = VersionListing)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_versions"))]
pub async fn get_versions(State(state): State<Arc<AppState>>) -> Json<VersionListing> {
    let catalog = load_catalog(state.storage.as_ref(), &state.catalog).await;
    tracing::debug!(count = catalog.len(), "Listed versions");
    Json(list_versions(&catalog, &state.config.extension_name))
}
