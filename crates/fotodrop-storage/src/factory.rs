//! Storage backend factory.

use crate::{Storage, StorageBackend, StorageError, StorageResult};
use fotodrop_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-drive")]
        StorageBackend::Drive => {
            let token = config.google_api_token().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("GOOGLE_API_TOKEN not configured".to_string())
            })?;
            let parent = config
                .drive_parent_folder_id()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("DRIVE_PARENT_FOLDER_ID not configured".to_string())
                })?;

            let storage =
                crate::DriveStorage::new(token, parent, config.external_call_timeout_secs())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-drive"))]
        StorageBackend::Drive => Err(StorageError::ConfigError(
            "Drive storage backend not available (storage-drive feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .unwrap_or_else(|| "http://localhost:3000/folders".to_string());

            let storage = crate::LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
