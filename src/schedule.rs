//! Minimal in-process ticker for running without an external scheduler.
//!
//! Runs are strictly sequential: the next tick is not awaited until the
//! current run has returned, and ticks missed while a run was in progress
//! are skipped rather than bunched up.

use std::future::Future;
use std::time::Duration;

use checkpoint::CursorStore;
use sync_core::{DocumentSink, SourceReader};
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::job::{ReplicationJob, RunOutcome};

/// Counters over a sequence of runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub runs: usize,
    pub advanced: usize,
    pub no_data: usize,
    pub failed: usize,
    pub rows: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &RunOutcome) {
        self.runs += 1;
        match outcome {
            RunOutcome::Advanced { count, .. } => {
                self.advanced += 1;
                self.rows += count;
            }
            RunOutcome::NoData { .. } => self.no_data += 1,
            RunOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Run the job every `interval` until `shutdown` resolves or `max_runs`
/// runs have completed. The first run starts immediately.
///
/// Fails without running anything if `interval` is zero.
pub async fn run_every<R, S, C, F>(
    job: &ReplicationJob<R, S, C>,
    interval: Duration,
    max_runs: Option<usize>,
    shutdown: F,
) -> anyhow::Result<RunStats>
where
    R: SourceReader,
    S: DocumentSink,
    C: CursorStore,
    F: Future<Output = ()>,
{
    if interval.is_zero() {
        anyhow::bail!("Interval must be greater than zero");
    }
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = RunStats::default();
    tokio::pin!(shutdown);

    loop {
        if max_runs.is_some_and(|max| stats.runs >= max) {
            break;
        }
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping after {} runs", stats.runs);
                break;
            }
            _ = ticker.tick() => {
                let outcome = job.run_once().await;
                stats.record(&outcome);
            }
        }
    }

    Ok(stats)
}
