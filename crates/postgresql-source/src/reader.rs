//! Batch window reader over a PostgreSQL table.

use anyhow::{Context, Result};
use sync_core::{FetchedRow, SourceReader};
use tokio_postgres::types::Type;
use tokio_postgres::{Client, Row, Statement};
use tracing::{debug, info};

use crate::client::{new_postgresql_client, quote_ident, quote_qualified};
use crate::convert::convert_row;
use crate::SourceOpts;

/// [`SourceReader`] that probes ids one by one with an exact-match lookup.
///
/// A fresh connection is opened for every batch and dropped afterwards,
/// so a broken connection never outlives the run that saw it.
pub struct PostgresSource {
    opts: SourceOpts,
    query: String,
}

impl PostgresSource {
    pub fn new(opts: SourceOpts) -> Result<Self> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = $1",
            quote_qualified(&opts.table)?,
            quote_ident(&opts.id_column)
        );
        Ok(Self { opts, query })
    }

    pub fn opts(&self) -> &SourceOpts {
        &self.opts
    }

    /// The lookup query used for every probe.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[async_trait::async_trait]
impl SourceReader for PostgresSource {
    async fn fetch_batch(&self, start: i64, size: usize) -> Result<Vec<FetchedRow>> {
        let client = new_postgresql_client(&self.opts.pg_config()).await?;
        let statement = client
            .prepare(&self.query)
            .await
            .with_context(|| format!("Failed to prepare lookup on {}", self.opts.table))?;

        info!(
            "Fetching ids {}..{} from {}",
            start,
            start.saturating_add(size as i64),
            self.opts.table
        );

        let mut batch = Vec::with_capacity(size);
        for offset in 0..size {
            let id = start
                .checked_add(offset as i64)
                .ok_or_else(|| anyhow::anyhow!("Id overflow at offset {offset} from {start}"))?;

            let row = probe(&client, &statement, id)
                .await
                .with_context(|| format!("Failed to fetch id {id} from {}", self.opts.table))?;

            match row {
                Some(row) => batch.push(FetchedRow::present(id, convert_row(&row, id)?)),
                None => {
                    debug!("No row found for id {id}, skipping");
                    batch.push(FetchedRow::absent(id));
                }
            }
        }

        Ok(batch)
    }
}

/// Run the lookup for one id, binding it with the width of the key column.
///
/// Ids outside the column's range cannot exist and are reported absent.
async fn probe(client: &Client, statement: &Statement, id: i64) -> Result<Option<Row>> {
    let param_type = statement
        .params()
        .first()
        .ok_or_else(|| anyhow::anyhow!("Lookup statement has no id parameter"))?;

    let row = match *param_type {
        Type::INT8 => client.query_opt(statement, &[&id]).await?,
        Type::INT4 => match i32::try_from(id) {
            Ok(id) => client.query_opt(statement, &[&id]).await?,
            Err(_) => None,
        },
        Type::INT2 => match i16::try_from(id) {
            Ok(id) => client.query_opt(statement, &[&id]).await?,
            Err(_) => None,
        },
        ref other => anyhow::bail!("Unsupported primary key type: {other}"),
    };
    Ok(row)
}
