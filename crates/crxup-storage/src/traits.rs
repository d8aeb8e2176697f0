//! Storage abstraction trait
//!
//! Archives live in one flat namespace: the storage key is the archive filename.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Archive storage backend.
///
/// Writers and readers are not coordinated; an upload only becomes visible under its
/// final name once it is completely written.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Directory holding the archives.
    fn root(&self) -> &Path;

    /// Names of the regular files currently stored (non-recursive, unordered).
    ///
    /// Returns `NotFound` when the storage directory itself does not exist.
    async fn list_filenames(&self) -> StorageResult<Vec<String>>;

    /// Store `data` under `filename`, replacing any previous file. Returns the final path.
    async fn upload(&self, filename: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Open a stored file as a stream, together with its length in bytes.
    async fn download_stream(&self, filename: &str) -> StorageResult<(u64, ByteStream)>;

    /// Verify the storage directory is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}
