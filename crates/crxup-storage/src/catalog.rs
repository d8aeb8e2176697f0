//! Directory scanning into a [`Catalog`].
//!
//! Scans never fail: an unreadable or missing directory is an empty catalog.

use crxup_core::{Catalog, CatalogSettings};

use crate::local::read_filenames;
use crate::traits::{Storage, StorageError, StorageResult};

/// Scan `settings.storage_directory` and build the ordered catalog.
pub async fn list_artifacts(settings: &CatalogSettings) -> Catalog {
    let listing = read_filenames(&settings.storage_directory).await;
    catalog_from_listing(listing, settings)
}

/// Same as [`list_artifacts`], reading through a storage backend.
pub async fn load_catalog(storage: &dyn Storage, settings: &CatalogSettings) -> Catalog {
    let listing = storage.list_filenames().await;
    catalog_from_listing(listing, settings)
}

fn catalog_from_listing(listing: StorageResult<Vec<String>>, settings: &CatalogSettings) -> Catalog {
    match listing {
        Ok(names) => Catalog::from_filenames(names, settings),
        Err(StorageError::NotFound(_)) => {
            tracing::debug!(
                directory = %settings.storage_directory.display(),
                "Storage directory does not exist, no versions available"
            );
            Catalog::empty()
        }
        Err(e) => {
            tracing::warn!(
                directory = %settings.storage_directory.display(),
                error = %e,
                "Failed to read storage directory, treating as empty"
            );
            Catalog::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ByteStream;
    use async_trait::async_trait;
    use bytes::Bytes;
    use crxup_core::ArchiveNaming;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn settings(dir: &Path) -> CatalogSettings {
        CatalogSettings::new(
            dir,
            "http://localhost:3000",
            "/pp-ext",
            ArchiveNaming::standard().unwrap(),
        )
    }

    struct FailingStorage {
        root: PathBuf,
    }

    #[async_trait]
    impl Storage for FailingStorage {
        fn root(&self) -> &Path {
            &self.root
        }

        async fn list_filenames(&self) -> StorageResult<Vec<String>> {
            Err(StorageError::BackendError("permission denied".to_string()))
        }

        async fn upload(&self, _filename: &str, _data: Bytes) -> StorageResult<PathBuf> {
            Err(StorageError::UploadFailed("read-only".to_string()))
        }

        async fn download_stream(&self, filename: &str) -> StorageResult<(u64, ByteStream)> {
            Err(StorageError::NotFound(filename.to_string()))
        }

        async fn health_check(&self) -> StorageResult<()> {
            Err(StorageError::BackendError("permission denied".to_string()))
        }
    }

    #[tokio::test]
    async fn test_scan_orders_matching_archives() {
        let dir = tempdir().unwrap();
        for name in [
            "crx-pp-extension-1.0.0.zip",
            "crx-pp-extension-2.1.0.zip",
            "crx-pp-extension-2.0.9.zip",
            "readme.txt",
        ] {
            std::fs::write(dir.path().join(name), b"zip").unwrap();
        }

        let catalog = list_artifacts(&settings(dir.path())).await;
        let names: Vec<_> = catalog.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "crx-pp-extension-2.1.0.zip",
                "crx-pp-extension-2.0.9.zip",
                "crx-pp-extension-1.0.0.zip",
            ]
        );
        assert_eq!(
            catalog.latest().unwrap().download_url,
            "http://localhost:3000/pp-ext/crx-pp-extension-2.1.0.zip"
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let catalog = list_artifacts(&settings(&dir.path().join("nope"))).await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_subdirectory_named_like_archive_is_skipped() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("crx-pp-extension-3.0.0.zip")).unwrap();
        std::fs::write(dir.path().join("crx-pp-extension-1.0.0.zip"), b"zip").unwrap();

        let catalog = list_artifacts(&settings(dir.path())).await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.latest().unwrap().version.to_string(), "1.0.0");
    }

    #[tokio::test]
    async fn test_storage_failure_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let storage = FailingStorage {
            root: dir.path().to_path_buf(),
        };
        let catalog = load_catalog(&storage, &settings(dir.path())).await;
        assert!(catalog.is_empty());
    }
}
