use crate::{LocalStorage, Storage, StorageResult};
use crxup_core::{DeploymentProfile, ServerConfig};
use std::sync::Arc;

/// Create the storage backend for the configured deployment profile.
///
/// The server profile creates the storage directory; the static profile only reads
/// whatever is already there.
pub async fn create_storage(config: &ServerConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.deployment_profile {
        DeploymentProfile::Server => {
            let storage = LocalStorage::new(config.storage_dir.clone()).await?;
            Ok(Arc::new(storage))
        }
        DeploymentProfile::Static => Ok(Arc::new(LocalStorage::existing(
            config.storage_dir.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, profile: DeploymentProfile) -> ServerConfig {
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.storage_dir = dir.to_path_buf();
        config.deployment_profile = profile;
        config
    }

    #[tokio::test]
    async fn test_server_profile_creates_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("extensions").join("pp-ext");

        let storage = create_storage(&config(&target, DeploymentProfile::Server))
            .await
            .unwrap();
        assert!(target.is_dir());
        assert_eq!(storage.root(), target.as_path());
    }

    #[tokio::test]
    async fn test_static_profile_does_not_create_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("public");

        let storage = create_storage(&config(&target, DeploymentProfile::Static))
            .await
            .unwrap();
        assert!(!target.exists());
        assert!(storage.health_check().await.is_err());
    }
}
