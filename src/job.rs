//! Checkpointed batch replication job.
//!
//! One call to [`ReplicationJob::run_once`] moves one window of ids:
//!
//! 1. Read the cursor `start` from the checkpoint store (0 if never set)
//! 2. Probe ids `[start, start + batch_size)` in the source
//! 3. Encode and upsert every present row, in id order
//! 4. Store `start + batch_size` as the new cursor
//!
//! The cursor is written only after every present row was upserted. Any
//! failure leaves it untouched, and because upserts overwrite by id, the
//! next run can replay the whole window safely. A window with no present
//! ids is reported as [`RunOutcome::NoData`] and is retried as-is.
//!
//! The job holds no locks. Callers must not run two jobs against the same
//! cursor name concurrently.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use checkpoint::{CursorStore, DEFAULT_CURSOR_NAME};
use sync_core::{DocumentSink, FetchedRow, RowCodec, SourceReader};
use tracing::{debug, error, info, warn};

use crate::error::ReplicationError;

/// Ids probed per run unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Fixed per-job settings.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Width of the id window probed per run
    pub batch_size: usize,
    /// Name of the cursor slot
    pub checkpoint_name: String,
    /// Integer primary key column of the source table
    pub id_column: String,
    /// Upper bound on fetching the whole window
    pub fetch_timeout: Option<Duration>,
    /// Upper bound on a single upsert
    pub write_timeout: Option<Duration>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            checkpoint_name: DEFAULT_CURSOR_NAME.to_string(),
            id_column: "id".to_string(),
            fetch_timeout: None,
            write_timeout: None,
        }
    }
}

/// Result of one run, as reported to the scheduler.
#[derive(Debug)]
pub enum RunOutcome {
    /// `count` rows were written and the cursor moved to `next_id`
    Advanced { count: usize, next_id: i64 },
    /// No id in the window starting at `start` exists yet
    NoData { start: i64 },
    /// The run failed; the cursor was not moved
    Failed(ReplicationError),
}

impl RunOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Number of rows written, 0 unless advanced.
    pub fn count(&self) -> usize {
        match self {
            Self::Advanced { count, .. } => *count,
            _ => 0,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advanced { count, next_id } => {
                write!(f, "advanced: {count} rows transferred, cursor now {next_id}")
            }
            Self::NoData { start } => write!(f, "no data: no rows found starting from id {start}"),
            Self::Failed(e) => write!(f, "failed ({}): {e}", e.kind()),
        }
    }
}

/// Replication job over a source reader, a document sink and a cursor store.
pub struct ReplicationJob<R, S, C> {
    source: R,
    sink: S,
    store: C,
    codec: RowCodec,
    config: JobConfig,
}

impl<R, S, C> ReplicationJob<R, S, C>
where
    R: SourceReader,
    S: DocumentSink,
    C: CursorStore,
{
    pub fn new(source: R, sink: S, store: C, config: JobConfig) -> anyhow::Result<Self> {
        if config.batch_size == 0 {
            anyhow::bail!("Batch size must be at least 1");
        }
        if i64::try_from(config.batch_size).is_err() {
            anyhow::bail!("Batch size {} is too large", config.batch_size);
        }
        Ok(Self {
            source,
            sink,
            store,
            codec: RowCodec::new(config.id_column.clone()),
            config,
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Current cursor value (0 if never written).
    pub async fn cursor(&self) -> anyhow::Result<i64> {
        self.store.load_cursor(&self.config.checkpoint_name).await
    }

    /// Run one batch and report its outcome.
    pub async fn run_once(&self) -> RunOutcome {
        match self.try_run().await {
            Ok(outcome) => {
                info!("Replication run {outcome}");
                outcome
            }
            Err(e) => {
                error!("Replication run failed: {e}");
                RunOutcome::Failed(e)
            }
        }
    }

    async fn try_run(&self) -> Result<RunOutcome, ReplicationError> {
        let name = &self.config.checkpoint_name;
        let size = self.config.batch_size;

        let start = self
            .store
            .load_cursor(name)
            .await
            .map_err(|error| ReplicationError::CheckpointRead {
                name: name.clone(),
                error,
            })?;

        let batch = with_timeout(self.config.fetch_timeout, self.source.fetch_batch(start, size))
            .await
            .and_then(|batch| check_window(&batch, start, size).map(|_| batch))
            .map_err(|error| ReplicationError::Fetch { start, error })?;

        let found = batch.iter().filter(|entry| entry.is_present()).count();
        if found == 0 {
            return Ok(RunOutcome::NoData { start });
        }
        debug!("Found {found} of {size} ids starting from {start}");

        self.sink
            .prepare()
            .await
            .map_err(|error| ReplicationError::Credentials { error })?;

        for entry in &batch {
            let Some(row) = &entry.row else {
                continue;
            };
            let document = self.codec.encode(row);
            with_timeout(self.config.write_timeout, self.sink.upsert(&document))
                .await
                .map_err(|error| ReplicationError::Write {
                    id: entry.id,
                    start,
                    offset: entry.id - start,
                    error,
                })?;
            info!("Transferred id {} to target", entry.id);
        }

        // batch_size fits in i64, checked in new()
        let next_id = start.checked_add(size as i64).ok_or_else(|| {
            ReplicationError::CheckpointWrite {
                name: name.clone(),
                next_id: i64::MAX,
                error: anyhow::anyhow!("cursor overflow from {start}"),
            }
        })?;

        self.store
            .write_cursor(name, next_id)
            .await
            .map_err(|error| {
                warn!("Rows up to id {} were written but cursor '{name}' was not stored", next_id - 1);
                ReplicationError::CheckpointWrite {
                    name: name.clone(),
                    next_id,
                    error,
                }
            })?;

        Ok(RunOutcome::Advanced {
            count: found,
            next_id,
        })
    }
}

/// Await `fut`, turning an elapsed `limit` into an ordinary error.
async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {limit:?}"))?,
        None => fut.await,
    }
}

/// The source must return exactly the probed window, in increasing id order.
fn check_window(batch: &[FetchedRow], start: i64, size: usize) -> anyhow::Result<()> {
    if batch.len() != size {
        anyhow::bail!("source returned {} entries for a window of {size}", batch.len());
    }
    for (offset, entry) in batch.iter().enumerate() {
        let expected = start + offset as i64;
        if entry.id != expected {
            anyhow::bail!("source returned id {} at offset {offset}, expected {expected}", entry.id);
        }
        if let Some(row) = &entry.row {
            if row.id != entry.id {
                anyhow::bail!("row for id {} carries id {}", entry.id, row.id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_core::SourceRow;

    #[test]
    fn test_check_window_accepts_ordered_window() {
        let batch = vec![
            FetchedRow::absent(10),
            FetchedRow::present(11, SourceRow::builder("id", 11).build()),
            FetchedRow::absent(12),
        ];
        assert!(check_window(&batch, 10, 3).is_ok());
    }

    #[test]
    fn test_check_window_rejects_short_or_shuffled_window() {
        let short = vec![FetchedRow::absent(10)];
        assert!(check_window(&short, 10, 2).is_err());

        let shuffled = vec![FetchedRow::absent(11), FetchedRow::absent(10)];
        assert!(check_window(&shuffled, 10, 2).is_err());

        let wrong_row = vec![FetchedRow::present(10, SourceRow::builder("id", 99).build())];
        assert!(check_window(&wrong_row, 10, 1).is_err());
    }

    #[test]
    fn test_outcome_display() {
        let advanced = RunOutcome::Advanced {
            count: 100,
            next_id: 600,
        };
        assert_eq!(
            advanced.to_string(),
            "advanced: 100 rows transferred, cursor now 600"
        );
        assert_eq!(advanced.count(), 100);

        let no_data = RunOutcome::NoData { start: 600 };
        assert!(no_data.is_no_data());
        assert_eq!(no_data.count(), 0);
    }

    #[tokio::test]
    async fn test_with_timeout_elapsed_is_error() {
        let result: anyhow::Result<()> = with_timeout(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(result.unwrap_err().to_string().contains("timed out"));
    }
}
