//! Error types module
//!
//! All delivery-pipeline errors are unified under the `DeliveryError` enum.
//! The propagation rules are:
//!
//! - `RecipientNotFound` / `EmptySource` / `NoAssets` abort an attempt before
//!   any remote side effect; nothing is recorded for them.
//! - `Upload` and `Send` are converted by the orchestrator into a failure
//!   outcome and routed to the outcome recorder; they never crash the process.
//! - `Record` is reported to the operator channel only and must never mask
//!   the delivery outcome that produced it.

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("recipient not found for model {0}")]
    RecipientNotFound(String),

    #[error("recipient source has no rows")]
    EmptySource,

    #[error("recipient source read failed: {0}")]
    SourceRead(String),

    #[error("no assets found for model {0}")]
    NoAssets(String),

    #[error("model {0} already has a delivered folder (pass force_resubmit to overwrite)")]
    AlreadyDelivered(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("email send failed: {0}")]
    Send(String),

    #[error("outcome recording failed: {0}")]
    Record(String),

    #[error("{stage} call timed out after {seconds}s")]
    Timeout { stage: &'static str, seconds: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Record(format!("JSON serialization error: {}", err))
    }
}

impl DeliveryError {
    /// Whether the error occurred before any remote side effect, meaning the
    /// attempt ends without an outcome record.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            DeliveryError::RecipientNotFound(_)
                | DeliveryError::EmptySource
                | DeliveryError::SourceRead(_)
                | DeliveryError::NoAssets(_)
                | DeliveryError::AlreadyDelivered(_)
        )
    }
}

/// Result type for delivery operations
pub type DeliveryResult<T> = Result<T, DeliveryError>;
