//! Multipart extraction for archive uploads

use crate::error::HttpAppError;
use axum::extract::Multipart;
use bytes::Bytes;
use crxup_core::AppError;

/// Multipart field carrying the archive.
pub const UPLOAD_FIELD: &str = "extension";

pub const NO_FILE_UPLOADED: &str = "No file uploaded";

/// A file part received from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Extract the single file sent under `field_name`.
///
/// Other fields are drained and ignored. A field without a filename is a plain form
/// value, not a file. An empty file counts as no file.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<UploadedFile, HttpAppError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if uploaded.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple file fields are not allowed; send exactly one field named '{}'",
                field_name
            ))
            .into());
        }

        let data = field.bytes().await?;
        uploaded = Some(UploadedFile { filename, data });
    }

    match uploaded {
        Some(file) if !file.data.is_empty() => Ok(file),
        _ => Err(AppError::InvalidInput(NO_FILE_UPLOADED.to_string()).into()),
    }
}
