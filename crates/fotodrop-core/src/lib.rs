//! Fotodrop Core Library
//!
//! This crate provides the domain models, error taxonomy, and configuration
//! shared across all fotodrop components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, LedgerBackend, StorageBackend};
pub use error::{DeliveryError, DeliveryResult};
pub use models::{
    DeliveryFolder, DeliveryReport, DeliveryRequest, DeliveryStatus, LogEntry, LogRecipient,
    Photographer, RecipientRecord, Stage,
};
