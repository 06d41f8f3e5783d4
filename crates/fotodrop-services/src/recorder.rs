//! Outcome recording: row coloring plus the audit-log append.
//!
//! Recorder failures go to the operator channel only; they never escalate,
//! so they cannot mask the delivery outcome already known to the operator.

use crate::sheets::{RowColor, Spreadsheet};
use chrono::Utc;
use fotodrop_core::{DeliveryStatus, LogEntry, LogRecipient, Photographer, RecipientRecord};
use fotodrop_ledger::DeliveryLog;
use std::sync::Arc;

/// Everything the recorder needs about a finished attempt.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub model_id: String,
    pub recipient: RecipientRecord,
    pub photographer: Photographer,
    pub status: DeliveryStatus,
    /// Diagnostic text, or the serialized provider response on success.
    pub message: String,
}

pub struct OutcomeRecorder {
    sheet: Arc<dyn Spreadsheet>,
    log: Arc<DeliveryLog>,
}

impl OutcomeRecorder {
    pub fn new(sheet: Arc<dyn Spreadsheet>, log: Arc<DeliveryLog>) -> Self {
        OutcomeRecorder { sheet, log }
    }

    /// Color the recipient's row and append one audit entry. Both steps are
    /// attempted even if the first fails.
    pub async fn record(&self, outcome: &DeliveryOutcome) {
        let color = match outcome.status {
            DeliveryStatus::Success => RowColor::Green,
            DeliveryStatus::Failed => RowColor::Red,
        };

        // Body row index + 1 accounts for the skipped header row.
        let sheet_row = outcome.recipient.row_index + 1;
        if let Err(e) = self.sheet.color_row(sheet_row, color).await {
            tracing::error!(model_id = %outcome.model_id, row = sheet_row, error = %e,
                "Failed to color status row");
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            model_id: outcome.model_id.clone(),
            recipient: LogRecipient {
                name: outcome.recipient.name.clone(),
                email: outcome.recipient.email.clone(),
            },
            photographer: outcome.photographer.clone(),
            status: outcome.status,
            message: outcome.message.clone(),
        };
        if let Err(e) = self.log.append(&entry).await {
            tracing::error!(model_id = %outcome.model_id, error = %e,
                "Failed to append audit entry");
        }
    }
}
