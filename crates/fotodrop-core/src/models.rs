//! Domain models for the delivery pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Photographer context for one session, passed explicitly through the
/// pipeline (never ambient process state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photographer {
    pub name: String,
    pub handle: String,
}

/// One delivery request, created per orchestrator invocation and dropped
/// when it returns.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    /// Model identifier; doubles as the local folder name and the short alias.
    pub model_id: String,
    /// Local asset paths in directory-listing order.
    pub local_asset_paths: Vec<PathBuf>,
    pub photographer: Photographer,
    /// When false (the default), a model that already has a ledger entry is
    /// rejected instead of silently getting a second remote folder.
    pub force_resubmit: bool,
}

/// A recipient row resolved from the tabular source. Never cached; the row
/// index must stay valid for the lifetime of one delivery attempt
/// (single-writer assumption on the sheet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRecord {
    pub email: String,
    pub name: String,
    /// 0-based position within the header-skipped body rows.
    pub row_index: usize,
}

/// A remote storage container created for one successful upload stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFolder {
    /// Opaque provider identifier.
    pub folder_id: String,
    /// Short alias URL handed to recipients; never the raw provider URL.
    pub public_link: String,
    /// Equals the model id.
    pub short_alias: String,
}

/// Final status of a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Success,
    Failed,
}

/// Pipeline stages that can fail a delivery attempt, in execution order.
/// Outcome recording swallows its own failures, so it never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Uploading,
    Notifying,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolving => "resolving",
            Stage::Uploading => "uploading",
            Stage::Notifying => "notifying",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipient identity as stored in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecipient {
    pub name: String,
    pub email: String,
}

/// One immutable audit-log record; exactly one is appended per delivery
/// attempt that reaches the upload stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub model_id: String,
    pub recipient: LogRecipient,
    pub photographer: Photographer,
    pub status: DeliveryStatus,
    /// Free-text diagnostic, or the serialized provider response on success.
    pub message: String,
}

/// What the orchestrator hands back to its caller.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub model_id: String,
    pub status: DeliveryStatus,
    /// The stage that failed, when `status` is `Failed`.
    pub failed_stage: Option<Stage>,
    pub message: String,
}
