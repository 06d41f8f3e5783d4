//! Alias ledger abstraction trait
//!
//! This module defines the `AliasLedger` trait that all ledger backends must
//! implement.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Ledger operation errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger read failed: {0}")]
    ReadFailed(String),

    #[error("Ledger write failed: {0}")]
    WriteFailed(String),

    #[error("Ledger backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable mapping from short alias (model id) to provider folder id.
///
/// Mutated by the asset uploader and the redirect service's update endpoint;
/// read by the redirect service on every `/view` lookup. Upserts are
/// last-write-wins and prior mappings are overwritten, not versioned.
#[async_trait]
pub trait AliasLedger: Send + Sync {
    /// Look up the folder id registered for an alias.
    async fn get(&self, alias: &str) -> LedgerResult<Option<String>>;

    /// Register or overwrite the mapping for an alias.
    async fn put(&self, alias: &str, folder_id: &str) -> LedgerResult<()>;

    /// Snapshot of all entries, sorted by alias. Used by operator tooling.
    async fn entries(&self) -> LedgerResult<BTreeMap<String, String>>;
}
