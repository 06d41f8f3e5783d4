//! Append-only delivery audit log.
//!
//! One JSON object per line. Entries are written with O_APPEND so a second
//! writer can never clobber earlier records, unlike a read-modify-rewrite of
//! a single JSON array. Exactly one entry is appended per delivery attempt
//! that reached the upload stage.

use crate::traits::{LedgerError, LedgerResult};
use fotodrop_core::LogEntry;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct DeliveryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DeliveryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DeliveryLog {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. The line is serialized up front so a serialization
    /// failure never leaves a partial line in the log.
    pub async fn append(&self, entry: &LogEntry) -> LedgerResult<()> {
        let mut line = serde_json::to_vec(entry)
            .map_err(|e| LedgerError::WriteFailed(format!("Failed to serialize entry: {}", e)))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                LedgerError::WriteFailed(format!(
                    "Failed to open log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(&line).await.map_err(|e| {
            LedgerError::WriteFailed(format!("Failed to append to {}: {}", self.path.display(), e))
        })?;
        file.flush().await?;
        Ok(())
    }

    /// Read the full log in order. Missing file reads as empty.
    pub async fn read_all(&self) -> LedgerResult<Vec<LogEntry>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::ReadFailed(format!(
                    "Failed to read log {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .map_err(|e| LedgerError::ReadFailed(format!("Corrupt log line: {}", e)))
            })
            .collect()
    }
}
