//! pg-dynamo-sync library
//!
//! Copies rows of a PostgreSQL table into a DynamoDB table in fixed-size
//! windows of integer primary keys, one window per run.
//!
//! # Crates
//!
//! - `sync_core` - row and document model, row codec, source and sink traits
//! - `checkpoint` - cursor storage (filesystem, PostgreSQL, memory)
//! - `postgresql_source` - reads id windows from PostgreSQL
//! - `dynamodb_sink` - writes documents to DynamoDB
//!
//! # CLI Usage
//!
//! ```bash
//! # One batch, for cron or an orchestrator
//! pg-dynamo-sync run-once --source-table netflix_historical.stock_prices --dynamodb-table stock_prices
//!
//! # Keep going every minute
//! pg-dynamo-sync run --interval 1m --source-table ... --dynamodb-table ...
//!
//! # Show the stored cursor
//! pg-dynamo-sync status
//! ```

pub mod config;
pub mod connect;
pub mod error;
pub mod job;
pub mod opts;
pub mod schedule;
pub mod testing;

pub use connect::{build_job, open_cursor_store, PostgresToDynamoJob};
pub use error::ReplicationError;
pub use job::{JobConfig, ReplicationJob, RunOutcome, DEFAULT_BATCH_SIZE};
pub use schedule::{run_every, RunStats};

/// Process exit status for a run that found nothing to do.
pub const EXIT_NO_DATA: i32 = 99;

/// Exit status a scheduler should see for `outcome`.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Advanced { .. } => 0,
        RunOutcome::NoData { .. } => EXIT_NO_DATA,
        RunOutcome::Failed(_) => 1,
    }
}
