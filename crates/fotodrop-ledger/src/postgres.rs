//! Postgres-backed alias ledger: a two-column table keyed by alias.

use crate::traits::{AliasLedger, LedgerError, LedgerResult};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS alias_ledger (
    alias      TEXT PRIMARY KEY,
    folder_id  TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Connect and make sure the ledger table exists.
    pub async fn connect(database_url: &str, timeout_secs: u64) -> LedgerResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| LedgerError::ConfigError(format!("Failed to connect: {}", e)))?;

        let ledger = PostgresLedger { pool };
        ledger.ensure_schema().await?;
        Ok(ledger)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        PostgresLedger { pool }
    }

    pub async fn ensure_schema(&self) -> LedgerResult<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::BackendError(format!("Failed to create schema: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl AliasLedger for PostgresLedger {
    async fn get(&self, alias: &str) -> LedgerResult<Option<String>> {
        let row = sqlx::query("SELECT folder_id FROM alias_ledger WHERE alias = $1")
            .bind(alias)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LedgerError::ReadFailed(e.to_string()))?;
        Ok(row.map(|r| r.get::<String, _>("folder_id")))
    }

    async fn put(&self, alias: &str, folder_id: &str) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO alias_ledger (alias, folder_id) VALUES ($1, $2) \
             ON CONFLICT (alias) DO UPDATE SET folder_id = EXCLUDED.folder_id, updated_at = now()",
        )
        .bind(alias)
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;

        tracing::debug!(alias = %alias, folder_id = %folder_id, "Alias upserted");
        Ok(())
    }

    async fn entries(&self) -> LedgerResult<BTreeMap<String, String>> {
        let rows = sqlx::query("SELECT alias, folder_id FROM alias_ledger ORDER BY alias")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::ReadFailed(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get::<String, _>("alias"), r.get::<String, _>("folder_id")))
            .collect())
    }
}
