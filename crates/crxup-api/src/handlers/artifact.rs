//! Artifact download handler

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use crxup_core::AppError;
use std::sync::Arc;

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Serve the raw bytes of a stored archive.
///
/// Only names that follow the archive naming convention are served.
#[utoipa::path(
    get,
    path = "/pp-ext/{filename}",
    tag = "versions",
    params(("filename" = String, Path, description = "Archive filename")),
    responses(
        (status = 200, description = "Archive bytes", content_type = "application/zip"),
        (status = 404, description = "No such archive", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_artifact"))]
pub async fn download_artifact(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    if !state.catalog.naming.matches(&filename) {
        return Err(AppError::NotFound(format!("File not found: {}", filename)).into());
    }

    let (content_length, stream) = state.storage.download_stream(&filename).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ZIP_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, content_length.to_string())
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
