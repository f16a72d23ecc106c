//! PostgreSQL cursor storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls};

use crate::store::{CursorStore, StoredCursor};

/// Default table holding cursor slots.
pub const DEFAULT_CHECKPOINT_TABLE: &str = "sync_checkpoints";

/// PostgreSQL implementation of CursorStore trait.
///
/// Stores one row per slot in a small key/value table, written with
/// `INSERT ... ON CONFLICT DO UPDATE` so each write replaces the slot.
/// Every operation uses its own short-lived connection.
pub struct PostgresStore {
    config: tokio_postgres::Config,
    table: String,
}

impl PostgresStore {
    /// Create a new PostgresStore without touching the database.
    ///
    /// The table name must be a plain identifier; it is quoted in queries.
    pub fn new(config: tokio_postgres::Config, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            anyhow::bail!("Invalid checkpoint table name: '{table}'");
        }
        Ok(Self { config, table })
    }

    /// Create the store and make sure its table exists.
    pub async fn connect(config: tokio_postgres::Config, table: &str) -> Result<Self> {
        let store = Self::new(config, table)?;
        store.ensure_table().await?;
        Ok(store)
    }

    async fn client(&self) -> Result<Client> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .context("Failed to connect to PostgreSQL checkpoint store")?;

        // Spawn connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL checkpoint connection error: {e}");
            }
        });

        Ok(client)
    }

    /// Create the cursor table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (
                name TEXT PRIMARY KEY,
                next_id BIGINT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            self.table
        );
        self.client()
            .await?
            .batch_execute(&ddl)
            .await
            .with_context(|| format!("Failed to create checkpoint table '{}'", self.table))?;
        Ok(())
    }
}

#[async_trait]
impl CursorStore for PostgresStore {
    async fn read_cursor(&self, name: &str) -> Result<Option<StoredCursor>> {
        let query = format!(
            "SELECT name, next_id, updated_at FROM \"{}\" WHERE name = $1",
            self.table
        );
        let row = self
            .client()
            .await?
            .query_opt(&query, &[&name])
            .await
            .with_context(|| format!("Failed to read cursor '{name}'"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let column_error = |column: &str| {
            format!(
                "Unexpected type for column '{column}' in checkpoint table '{}'",
                self.table
            )
        };
        Ok(Some(StoredCursor {
            name: row
                .try_get::<_, String>(0)
                .with_context(|| column_error("name"))?,
            next_id: row
                .try_get::<_, i64>(1)
                .with_context(|| column_error("next_id"))?,
            updated_at: row
                .try_get::<_, DateTime<Utc>>(2)
                .with_context(|| column_error("updated_at"))?,
        }))
    }

    async fn write_cursor(&self, name: &str, next_id: i64) -> Result<()> {
        let query = format!(
            "INSERT INTO \"{}\" (name, next_id, updated_at) VALUES ($1, $2, now())
             ON CONFLICT (name) DO UPDATE
             SET next_id = EXCLUDED.next_id, updated_at = EXCLUDED.updated_at",
            self.table
        );
        self.client()
            .await?
            .execute(&query, &[&name, &next_id])
            .await
            .with_context(|| format!("Failed to write cursor '{name}'"))?;

        tracing::debug!("Stored cursor {name}={next_id} in table '{}'", self.table);
        Ok(())
    }
}
