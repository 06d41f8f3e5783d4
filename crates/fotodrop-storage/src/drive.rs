//! Google Drive storage implementation (Drive v3 REST API).
//!
//! Auth is a ready bearer token supplied through configuration; token
//! acquisition and refresh live outside this crate. Every request carries
//! the client-level timeout so a hung provider call cannot stall a delivery
//! indefinitely.

use crate::traits::{RemoteFolder, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const MULTIPART_BOUNDARY: &str = "fotodrop_upload_boundary";

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

pub struct DriveStorage {
    client: reqwest::Client,
    token: String,
    parent_folder_id: String,
}

impl DriveStorage {
    pub fn new(token: String, parent_folder_id: String, timeout_secs: u64) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build client: {}", e)))?;

        Ok(DriveStorage {
            client,
            token,
            parent_folder_id,
        })
    }

    /// Drive v3 `uploadType=multipart` body: a `multipart/related` payload
    /// with a JSON metadata part followed by the media part.
    fn multipart_body(metadata: &serde_json::Value, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(data.len() + 512);
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: {c}\r\n\r\n",
                b = MULTIPART_BOUNDARY,
                m = metadata,
                c = content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--", MULTIPART_BOUNDARY).as_bytes());
        body
    }

    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        format!("HTTP {}: {}", status, text)
    }
}

#[async_trait]
impl Storage for DriveStorage {
    async fn create_folder(&self, name: &str) -> StorageResult<RemoteFolder> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidName("empty folder name".to_string()));
        }

        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [self.parent_folder_id],
        });

        let response = self
            .client
            .post(DRIVE_FILES_URL)
            .bearer_auth(&self.token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| StorageError::FolderCreateFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::FolderCreateFailed(
                Self::error_text(response).await,
            ));
        }

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| StorageError::FolderCreateFailed(e.to_string()))?;

        tracing::info!(folder = %name, folder_id = %file.id, "Drive folder created");

        let url = self.folder_url(&file.id);
        Ok(RemoteFolder { id: file.id, url })
    }

    async fn grant_public_read(&self, folder_id: &str) -> StorageResult<()> {
        let body = serde_json::json!({
            "role": "reader",
            "type": "anyone",
        });

        let response = self
            .client
            .post(format!("{}/{}/permissions", DRIVE_FILES_URL, folder_id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::PermissionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::PermissionFailed(
                Self::error_text(response).await,
            ));
        }
        Ok(())
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let metadata = serde_json::json!({
            "name": filename,
            "parents": [folder_id],
        });
        let body = Self::multipart_body(&metadata, content_type, &data);

        let response = self
            .client
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::UploadFailed(Self::error_text(response).await));
        }

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(file = %filename, file_id = %file.id, "Asset uploaded");
        Ok(file.id)
    }

    fn folder_url(&self, folder_id: &str) -> String {
        format!("https://drive.google.com/drive/folders/{}", folder_id)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Drive
    }
}
