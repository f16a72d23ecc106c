//! Source and sink trait definitions.
//!
//! The replication job is generic over these traits so that each run is
//! statically dispatched to a concrete PostgreSQL reader and DynamoDB
//! writer in production, and to in-memory doubles in tests.

use anyhow::Result;

use crate::document::Document;
use crate::values::SourceRow;

/// Result of probing one id of a batch window.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRow {
    /// The probed primary key value
    pub id: i64,
    /// The row, or `None` when the id is absent from the source (a gap)
    pub row: Option<SourceRow>,
}

impl FetchedRow {
    pub fn present(id: i64, row: SourceRow) -> Self {
        Self { id, row: Some(row) }
    }

    pub fn absent(id: i64) -> Self {
        Self { id, row: None }
    }

    pub fn is_present(&self) -> bool {
        self.row.is_some()
    }
}

/// Reads contiguous id windows from the relational source.
#[async_trait::async_trait]
pub trait SourceReader: Send + Sync {
    /// Probe ids `start..start + size` by exact primary key lookup.
    ///
    /// Returns exactly `size` entries in strictly increasing id order.
    /// A missing id is reported as an absent entry, never as an error;
    /// errors are reserved for connection and query failures and abort
    /// the whole batch.
    async fn fetch_batch(&self, start: i64, size: usize) -> Result<Vec<FetchedRow>>;
}

/// Writes documents to the target store.
///
/// Writes must be keyed upserts: writing the same document twice leaves
/// the stored item identical to writing it once.
#[async_trait::async_trait]
pub trait DocumentSink: Send + Sync {
    /// Resolve credentials and any other per-run prerequisites.
    ///
    /// Called once per run, after at least one row was found and before
    /// the first `upsert`.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Insert or overwrite the document keyed by its id.
    async fn upsert(&self, document: &Document) -> Result<()>;
}
