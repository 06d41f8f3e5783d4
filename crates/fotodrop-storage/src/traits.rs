//! Storage abstraction trait
//!
//! This module defines the `Storage` trait that all delivery storage backends
//! must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Folder creation failed: {0}")]
    FolderCreateFailed(String),

    #[error("Permission grant failed: {0}")]
    PermissionFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid folder name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A freshly created remote folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFolder {
    /// Opaque provider identifier.
    pub id: String,
    /// Direct provider URL to the folder.
    pub url: String,
}

/// Storage abstraction trait
///
/// All delivery storage backends (Google Drive, local filesystem) implement
/// this trait so the asset uploader never couples to provider details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a folder with the given name under the fixed parent container.
    async fn create_folder(&self, name: &str) -> StorageResult<RemoteFolder>;

    /// Grant "anyone with the link can view" on the folder.
    async fn grant_public_read(&self, folder_id: &str) -> StorageResult<()>;

    /// Upload one object into the folder. Returns the provider file id.
    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Direct provider URL for a folder id.
    fn folder_url(&self, folder_id: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Declared content type for an asset, derived from its file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.gif"), "image/gif");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
    }
}
