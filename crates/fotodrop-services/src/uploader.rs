//! Asset upload stage: remote folder creation, alias registration, and
//! sequential file uploads.

use fotodrop_core::{DeliveryError, DeliveryFolder, DeliveryRequest, DeliveryResult};
use fotodrop_ledger::AliasLedger;
use fotodrop_storage::{content_type_for, Storage};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::sync::Arc;

pub struct AssetUploader {
    storage: Arc<dyn Storage>,
    ledger: Arc<dyn AliasLedger>,
    public_base_url: String,
}

impl AssetUploader {
    pub fn new(
        storage: Arc<dyn Storage>,
        ledger: Arc<dyn AliasLedger>,
        public_base_url: String,
    ) -> Self {
        AssetUploader {
            storage,
            ledger,
            public_base_url,
        }
    }

    /// The short alias URL recipients see; never the raw provider domain.
    fn alias_link(&self, model_id: &str) -> String {
        format!(
            "{}/view/{}",
            self.public_base_url.trim_end_matches('/'),
            utf8_percent_encode(model_id, NON_ALPHANUMERIC)
        )
    }

    /// Upload a model's assets:
    ///
    /// 1. Refuse a duplicate alias unless the request forces a resubmit.
    /// 2. Create the remote folder named after the model id.
    /// 3. Grant public read; a failure here is logged and does not abort,
    ///    the folder just may not be viewable yet (no rollback).
    /// 4. Register the alias mapping before any file goes up, so a partial
    ///    upload still leaves the folder reachable.
    /// 5. Upload each asset sequentially in listing order. Any failure
    ///    aborts the stage; already-uploaded files stay where they are.
    pub async fn upload(&self, request: &DeliveryRequest) -> DeliveryResult<DeliveryFolder> {
        let model_id = &request.model_id;

        if request.local_asset_paths.is_empty() {
            return Err(DeliveryError::NoAssets(model_id.clone()));
        }

        let existing = self
            .ledger
            .get(model_id)
            .await
            .map_err(|e| DeliveryError::Upload(format!("ledger read: {}", e)))?;
        if let Some(folder_id) = existing {
            if !request.force_resubmit {
                tracing::warn!(model_id = %model_id, folder_id = %folder_id,
                    "Alias already registered; refusing resubmit");
                return Err(DeliveryError::AlreadyDelivered(model_id.clone()));
            }
            tracing::info!(model_id = %model_id, old_folder_id = %folder_id,
                "Forced resubmit; a new folder will replace the alias mapping");
        }

        tracing::info!(model_id = %model_id, "Creating delivery folder");
        let folder = self
            .storage
            .create_folder(model_id)
            .await
            .map_err(|e| DeliveryError::Upload(e.to_string()))?;

        if let Err(e) = self.storage.grant_public_read(&folder.id).await {
            tracing::warn!(folder_id = %folder.id, error = %e,
                "Public read grant failed; folder may not be viewable");
        }

        self.ledger
            .put(model_id, &folder.id)
            .await
            .map_err(|e| DeliveryError::Upload(format!("ledger write: {}", e)))?;

        tracing::info!(model_id = %model_id, count = request.local_asset_paths.len(),
            "Uploading assets");
        for path in &request.local_asset_paths {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    DeliveryError::Upload(format!("invalid asset path: {}", path.display()))
                })?
                .to_string();
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| DeliveryError::Upload(format!("read {}: {}", path.display(), e)))?;

            self.storage
                .upload_file(&folder.id, &filename, content_type_for(&filename), data)
                .await
                .map_err(|e| DeliveryError::Upload(e.to_string()))?;

            tracing::info!(model_id = %model_id, file = %filename, "Uploaded");
        }

        Ok(DeliveryFolder {
            folder_id: folder.id,
            public_link: self.alias_link(model_id),
            short_alias: model_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fotodrop_core::Photographer;
    use fotodrop_ledger::FileLedger;
    use fotodrop_storage::{RemoteFolder, StorageBackend, StorageError, StorageResult};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory storage fake with switchable failure points.
    struct FakeStorage {
        folder_counter: AtomicUsize,
        uploaded: Mutex<Vec<String>>,
        fail_folder_create: bool,
        fail_permission: bool,
        fail_upload_after: Option<usize>,
    }

    impl FakeStorage {
        fn new() -> Self {
            FakeStorage {
                folder_counter: AtomicUsize::new(0),
                uploaded: Mutex::new(Vec::new()),
                fail_folder_create: false,
                fail_permission: false,
                fail_upload_after: None,
            }
        }
    }

    #[async_trait]
    impl Storage for FakeStorage {
        async fn create_folder(&self, _name: &str) -> StorageResult<RemoteFolder> {
            if self.fail_folder_create {
                return Err(StorageError::FolderCreateFailed("quota exceeded".into()));
            }
            let n = self.folder_counter.fetch_add(1, Ordering::SeqCst) + 1;
            let id = format!("F{}", n);
            let url = self.folder_url(&id);
            Ok(RemoteFolder { id, url })
        }

        async fn grant_public_read(&self, _folder_id: &str) -> StorageResult<()> {
            if self.fail_permission {
                return Err(StorageError::PermissionFailed("denied".into()));
            }
            Ok(())
        }

        async fn upload_file(
            &self,
            folder_id: &str,
            filename: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> StorageResult<String> {
            let mut uploaded = self.uploaded.lock().unwrap();
            if let Some(limit) = self.fail_upload_after {
                if uploaded.len() >= limit {
                    return Err(StorageError::UploadFailed("connection reset".into()));
                }
            }
            uploaded.push(format!("{}/{}", folder_id, filename));
            Ok(format!("id-{}", filename))
        }

        fn folder_url(&self, folder_id: &str) -> String {
            format!("https://provider.example/folders/{}", folder_id)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn request(model_id: &str, paths: Vec<PathBuf>, force: bool) -> DeliveryRequest {
        DeliveryRequest {
            model_id: model_id.to_string(),
            local_asset_paths: paths,
            photographer: Photographer {
                name: "Sam".into(),
                handle: "@sam".into(),
            },
            force_resubmit: force,
        }
    }

    fn write_assets(dir: &tempfile::TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, b"JPEG").unwrap();
                path
            })
            .collect()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        storage: Arc<FakeStorage>,
        ledger: Arc<FileLedger>,
        uploader: AssetUploader,
        assets: Vec<PathBuf>,
    }

    fn fixture(storage: FakeStorage) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let assets = write_assets(&dir, &["a.jpg", "b.png"]);
        let storage = Arc::new(storage);
        let ledger = Arc::new(FileLedger::new(dir.path().join("redirects.json")));
        let uploader = AssetUploader::new(
            storage.clone(),
            ledger.clone(),
            "https://mail.example.com".to_string(),
        );
        Fixture {
            _dir: dir,
            storage,
            ledger,
            uploader,
            assets,
        }
    }

    #[tokio::test]
    async fn successful_upload_registers_alias_and_returns_short_link() {
        let f = fixture(FakeStorage::new());
        let folder = f
            .uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap();

        assert_eq!(folder.folder_id, "F1");
        assert_eq!(folder.short_alias, "042");
        assert_eq!(folder.public_link, "https://mail.example.com/view/042");
        assert_eq!(
            f.ledger.get("042").await.unwrap().as_deref(),
            Some("F1")
        );
        assert_eq!(
            *f.storage.uploaded.lock().unwrap(),
            vec!["F1/a.jpg".to_string(), "F1/b.png".to_string()]
        );
    }

    #[tokio::test]
    async fn alias_link_percent_encodes_the_model_id() {
        let f = fixture(FakeStorage::new());
        assert_eq!(
            f.uploader.alias_link("mod 42"),
            "https://mail.example.com/view/mod%2042"
        );
    }

    #[tokio::test]
    async fn empty_asset_list_is_rejected_before_any_side_effect() {
        let f = fixture(FakeStorage::new());
        let err = f
            .uploader
            .upload(&request("042", vec![], false))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::NoAssets(_)));
        assert!(f.ledger.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_alias_is_rejected_without_force() {
        let f = fixture(FakeStorage::new());
        f.uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap();

        let err = f
            .uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::AlreadyDelivered(_)));
        // Mapping untouched, no second folder uploaded into.
        assert_eq!(f.ledger.get("042").await.unwrap().as_deref(), Some("F1"));
    }

    #[tokio::test]
    async fn forced_resubmit_creates_a_new_folder_and_overwrites_the_alias() {
        let f = fixture(FakeStorage::new());
        f.uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap();
        let folder = f
            .uploader
            .upload(&request("042", f.assets.clone(), true))
            .await
            .unwrap();

        assert_eq!(folder.folder_id, "F2");
        assert_eq!(f.ledger.get("042").await.unwrap().as_deref(), Some("F2"));
    }

    #[tokio::test]
    async fn folder_create_failure_aborts_with_upload_error() {
        let f = fixture(FakeStorage {
            fail_folder_create: true,
            ..FakeStorage::new()
        });
        let err = f
            .uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Upload(_)));
        assert!(f.ledger.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn permission_failure_does_not_abort_the_stage() {
        let f = fixture(FakeStorage {
            fail_permission: true,
            ..FakeStorage::new()
        });
        let folder = f
            .uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap();
        assert_eq!(folder.folder_id, "F1");
        assert_eq!(f.storage.uploaded.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mid_upload_failure_keeps_ledger_entry_and_partial_files() {
        let f = fixture(FakeStorage {
            fail_upload_after: Some(1),
            ..FakeStorage::new()
        });
        let err = f
            .uploader
            .upload(&request("042", f.assets.clone(), false))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Upload(_)));
        // The alias was registered before the failing upload and stays.
        assert_eq!(f.ledger.get("042").await.unwrap().as_deref(), Some("F1"));
        assert_eq!(*f.storage.uploaded.lock().unwrap(), vec!["F1/a.jpg".to_string()]);
    }
}
