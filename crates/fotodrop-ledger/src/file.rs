//! File-backed alias ledger: one JSON object `{alias: folder_id}`.
//!
//! Reads tolerate a missing file (empty ledger). Writes re-read the file,
//! merge the new entry, and replace the file via tempfile + rename so a
//! crash mid-write never leaves a truncated ledger. A process-local mutex
//! serializes writers within this process; cross-process races with the
//! redirect service remain last-write-wins.

use crate::traits::{AliasLedger, LedgerError, LedgerResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct FileLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLedger {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> LedgerResult<BTreeMap<String, String>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                LedgerError::ReadFailed(format!(
                    "Failed to parse ledger file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(LedgerError::ReadFailed(format!(
                "Failed to read ledger file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn store(&self, entries: &BTreeMap<String, String>) -> LedgerResult<()> {
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| LedgerError::WriteFailed(format!("Failed to serialize ledger: {}", e)))?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir).await?;

        // Write to a sibling tempfile, then rename over the ledger.
        let tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
            LedgerError::WriteFailed(format!("Failed to create temp ledger file: {}", e))
        })?;
        fs::write(tmp.path(), &json).await.map_err(|e| {
            LedgerError::WriteFailed(format!("Failed to write temp ledger file: {}", e))
        })?;
        tmp.persist(&self.path).map_err(|e| {
            LedgerError::WriteFailed(format!(
                "Failed to replace ledger file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[async_trait]
impl AliasLedger for FileLedger {
    async fn get(&self, alias: &str) -> LedgerResult<Option<String>> {
        Ok(self.load().await?.remove(alias))
    }

    async fn put(&self, alias: &str, folder_id: &str) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let previous = entries.insert(alias.to_string(), folder_id.to_string());
        self.store(&entries).await?;
        if let Some(old) = previous {
            tracing::warn!(alias = %alias, old_folder_id = %old, new_folder_id = %folder_id,
                "Alias mapping overwritten");
        } else {
            tracing::debug!(alias = %alias, folder_id = %folder_id, "Alias registered");
        }
        Ok(())
    }

    async fn entries(&self) -> LedgerResult<BTreeMap<String, String>> {
        self.load().await
    }
}
