//! Fotodrop Services Library
//!
//! The delivery pipeline services: recipient resolution against the
//! spreadsheet, asset upload into remote storage, email notification, outcome
//! recording, and the orchestrator that sequences them.

pub mod notifier;
pub mod orchestrator;
pub mod recorder;
pub mod resolver;
pub mod sheets;
pub mod uploader;

// Re-export commonly used types
pub use notifier::{
    EmailAttachment, EmailTransport, Notifier, OutgoingEmail, SendReceipt, SmtpMailer,
};
pub use orchestrator::DeliveryPipeline;
pub use recorder::{DeliveryOutcome, OutcomeRecorder};
pub use resolver::RecipientResolver;
pub use sheets::{GoogleSheets, RowColor, Spreadsheet};
pub use uploader::AssetUploader;
