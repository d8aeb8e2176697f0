//! Update descriptor handler

use super::ExtensionIdQuery;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use crxup_core::descriptor::require_extension_id;
use crxup_core::resolve_latest;
use crxup_storage::load_catalog;
use std::sync::Arc;

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Update pointer for the newest version, in the `gupdate` XML format.
#[utoipa::path(
    get,
    path = "/pp-ext/update.xml",
    tag = "updates",
    params(ExtensionIdQuery),
    responses(
        (status = 200, description = "Update descriptor", content_type = "application/xml", body = String),
        (status = 400, description = "Extension ID missing", body = ErrorResponse),
        (status = 404, description = "No versions available", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "update_xml", extension_id = tracing::field::Empty))]
pub async fn get_update_xml(
    Query(query): Query<ExtensionIdQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let extension_id = require_extension_id(query.extension_id())?;
    tracing::Span::current().record("extension_id", extension_id);

    let catalog = load_catalog(state.storage.as_ref(), &state.catalog).await;
    let descriptor = resolve_latest(&catalog, Some(extension_id))?;
    let xml = descriptor.to_xml()?;

    tracing::info!(
        version = %descriptor.version,
        codebase = %descriptor.codebase,
        "Served update descriptor"
    );

    Ok(([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], xml))
}
