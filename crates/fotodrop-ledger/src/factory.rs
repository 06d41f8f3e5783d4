//! Ledger backend factory.

use crate::{AliasLedger, LedgerError, LedgerResult};
use fotodrop_core::{Config, LedgerBackend};
use std::sync::Arc;

/// Create an alias ledger based on configuration.
pub async fn create_ledger(config: &Config) -> LedgerResult<Arc<dyn AliasLedger>> {
    match config.ledger_backend() {
        #[cfg(feature = "ledger-file")]
        LedgerBackend::File => {
            let ledger = crate::FileLedger::new(config.ledger_path());
            Ok(Arc::new(ledger))
        }

        #[cfg(not(feature = "ledger-file"))]
        LedgerBackend::File => Err(LedgerError::ConfigError(
            "File ledger backend not available (ledger-file feature not enabled)".to_string(),
        )),

        #[cfg(feature = "ledger-postgres")]
        LedgerBackend::Postgres => {
            let database_url = config.database_url().ok_or_else(|| {
                LedgerError::ConfigError("DATABASE_URL not configured".to_string())
            })?;
            let ledger = crate::PostgresLedger::connect(
                database_url,
                config.external_call_timeout_secs(),
            )
            .await?;
            Ok(Arc::new(ledger))
        }

        #[cfg(not(feature = "ledger-postgres"))]
        LedgerBackend::Postgres => Err(LedgerError::ConfigError(
            "Postgres ledger backend not available (ledger-postgres feature not enabled)"
                .to_string(),
        )),
    }
}
