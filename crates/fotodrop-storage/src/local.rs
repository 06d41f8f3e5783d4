//! Local filesystem storage implementation, used for development and tests.
//!
//! A delivery folder is a directory under the base path; the folder id is the
//! directory name. Public-read is a no-op since local files carry no ACLs.

use crate::traits::{RemoteFolder, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Reject names that could escape the base directory.
    fn validate_name(name: &str) -> StorageResult<()> {
        if name.trim().is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn create_folder(&self, name: &str) -> StorageResult<RemoteFolder> {
        Self::validate_name(name)?;
        let path = self.base_path.join(name);
        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::FolderCreateFailed(format!(
                "Failed to create {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(folder = %name, path = %path.display(), "Local folder created");

        Ok(RemoteFolder {
            id: name.to_string(),
            url: self.folder_url(name),
        })
    }

    async fn grant_public_read(&self, _folder_id: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        Self::validate_name(folder_id)?;
        Self::validate_name(filename)?;
        let path = self.base_path.join(folder_id).join(filename);

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync {}: {}", path.display(), e))
        })?;

        Ok(format!("{}/{}", folder_id, filename))
    }

    fn folder_url(&self, folder_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), folder_id)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/folders".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_folder_and_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        let folder = storage.create_folder("042").await.unwrap();
        assert_eq!(folder.id, "042");
        assert_eq!(folder.url, "http://localhost:3000/folders/042");

        let file_id = storage
            .upload_file("042", "a.jpg", "image/jpeg", b"JPEG".to_vec())
            .await
            .unwrap();
        assert_eq!(file_id, "042/a.jpg");
        assert_eq!(std::fs::read(dir.path().join("042/a.jpg")).unwrap(), b"JPEG");
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        assert!(matches!(
            storage.create_folder("../evil").await,
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            storage
                .upload_file("042", "../../etc/passwd", "image/jpeg", vec![])
                .await,
            Err(StorageError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn public_read_grant_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;
        storage.create_folder("042").await.unwrap();
        assert!(storage.grant_public_read("042").await.is_ok());
    }
}
