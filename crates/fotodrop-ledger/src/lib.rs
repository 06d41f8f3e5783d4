//! Fotodrop Ledger Library
//!
//! Durable state shared between the delivery pipeline and the redirect
//! service: the alias ledger (short alias -> provider folder id) and the
//! append-only delivery audit log.
//!
//! The ledger is deliberately a small key-value contract so the uploader and
//! the redirect resolver depend only on the `AliasLedger` trait, not on the
//! chosen persistence (JSON file or Postgres table). Writes are last-write-wins
//! and there is no cross-process locking; acceptable because writes are one
//! per delivery and reads are idempotent lookups.

pub mod audit;
pub mod factory;
#[cfg(feature = "ledger-file")]
pub mod file;
#[cfg(feature = "ledger-postgres")]
pub mod postgres;
pub mod traits;

// Re-export commonly used types
pub use audit::DeliveryLog;
pub use factory::create_ledger;
#[cfg(feature = "ledger-file")]
pub use file::FileLedger;
#[cfg(feature = "ledger-postgres")]
pub use postgres::PostgresLedger;
pub use traits::{AliasLedger, LedgerError, LedgerResult};
