//! Archive upload handler

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, UPLOAD_FIELD};
use axum::{
    extract::{Multipart, State},
    Json,
};
use crxup_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub const UPLOAD_SUCCESS: &str = "Extension uploaded successfully";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Extension uploaded successfully")]
    pub message: String,
    #[schema(example = "3.0.1")]
    pub version: String,
    #[schema(example = "crx-pp-extension-3.0.1.zip")]
    pub filename: String,
    #[schema(example = "http://localhost:3000/pp-ext/crx-pp-extension-3.0.1.zip")]
    pub url: String,
}

/// Multipart body documented for the OpenAPI schema.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Archive named `crx-pp-extension-X.Y.Z.zip`
    #[schema(value_type = String, format = Binary)]
    pub extension: Vec<u8>,
}

/// Store a new archive. The filename must follow the archive naming convention;
/// anything else is rejected before it reaches storage.
#[utoipa::path(
    post,
    path = "/pp-ext/upload",
    tag = "versions",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Archive stored", body = UploadResponse),
        (status = 400, description = "No file or invalid filename", body = ErrorResponse),
        (status = 413, description = "Archive too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_extension"))]
pub async fn upload_extension(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let file = extract_multipart_file(multipart, UPLOAD_FIELD).await?;

    let naming = &state.catalog.naming;
    let version = naming.parse_version(&file.filename).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Invalid version format in filename. Expected {}",
            naming.describe()
        ))
    })?;

    let size_bytes = file.data.len();
    state.storage.upload(&file.filename, file.data).await?;

    tracing::info!(
        version = %version,
        filename = %file.filename,
        size_bytes,
        "Extension uploaded"
    );

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS.to_string(),
        version: version.to_string(),
        url: state.catalog.download_url(&file.filename),
        filename: file.filename,
    }))
}
