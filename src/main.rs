//! Command-line interface for pg-dynamo-sync
//!
//! # Usage Examples
//!
//! ```bash
//! # Replicate one window of 100 ids and exit
//! pg-dynamo-sync run-once \
//!   --source-table netflix_historical.stock_prices \
//!   --dynamodb-table stock_prices
//!
//! # Replicate a window every 30 seconds, cursor kept in the source database
//! pg-dynamo-sync run --interval 30s \
//!   --source-table netflix_historical.stock_prices \
//!   --dynamodb-table stock_prices \
//!   --checkpoint-backend postgresql
//!
//! # Print the stored cursor
//! pg-dynamo-sync status --source-table netflix_historical.stock_prices
//! ```
//!
//! ## Exit Status
//! - `run-once`: 0 when the cursor advanced, 99 when no row was found, 1 on failure
//! - `run`, `status`: 0 unless startup fails

use std::time::Duration;

use checkpoint::CursorStore;
use clap::{Parser, Subcommand};
use pg_dynamo_sync::config::parse_interval;
use pg_dynamo_sync::opts::{CheckpointArgs, JobArgs, SourceArgs, TargetArgs};
use pg_dynamo_sync::{build_job, exit_code, open_cursor_store, run_every};
use postgresql_source::SourceOpts;
use tracing::info;

#[derive(Parser)]
#[command(name = "pg-dynamo-sync")]
#[command(about = "Checkpointed batch replication of PostgreSQL rows into DynamoDB")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replicate one batch and exit with a status describing the outcome
    RunOnce {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        checkpoint: CheckpointArgs,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Replicate one batch per interval until interrupted
    Run {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        checkpoint: CheckpointArgs,

        #[command(flatten)]
        job: JobArgs,

        /// Time between run starts (e.g. "30s", "1m")
        #[arg(long, default_value = "1m", value_parser = parse_interval)]
        interval: Duration,

        /// Stop after this many runs
        #[arg(long)]
        max_runs: Option<usize>,
    },

    /// Print the stored cursor
    Status {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        checkpoint: CheckpointArgs,

        /// Print the cursor record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunOnce {
            source,
            target,
            checkpoint,
            job,
        } => {
            let config = job.job_config(&checkpoint, &source);
            let job = build_job(
                SourceOpts::from(&source),
                target.target_opts(),
                target.credential_source(),
                &checkpoint.storage(),
                config,
            )
            .await?;
            let outcome = job.run_once().await;
            println!("{outcome}");
            Ok(exit_code(&outcome))
        }
        Commands::Run {
            source,
            target,
            checkpoint,
            job,
            interval,
            max_runs,
        } => {
            let config = job.job_config(&checkpoint, &source);
            let job = build_job(
                SourceOpts::from(&source),
                target.target_opts(),
                target.credential_source(),
                &checkpoint.storage(),
                config,
            )
            .await?;
            info!(
                "Running batches of {} every {interval:?}, press Ctrl-C to stop",
                job.config().batch_size
            );
            let stats = run_every(&job, interval, max_runs, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            })
            .await?;
            info!(
                "Stopped after {} runs: {} advanced, {} without data, {} failed, {} rows",
                stats.runs, stats.advanced, stats.no_data, stats.failed, stats.rows
            );
            Ok(0)
        }
        Commands::Status {
            source,
            checkpoint,
            json,
        } => {
            let store = open_cursor_store(&checkpoint.storage(), &SourceOpts::from(&source)).await?;
            let cursor = store.read_cursor(&checkpoint.checkpoint_name).await?;
            match (cursor, json) {
                (Some(cursor), true) => println!("{}", serde_json::to_string_pretty(&cursor)?),
                (Some(cursor), false) => println!(
                    "{}: next id {} (updated {})",
                    cursor.name, cursor.next_id, cursor.updated_at
                ),
                (None, true) => println!("null"),
                (None, false) => println!(
                    "{}: not set, the next run starts from id 0",
                    checkpoint.checkpoint_name
                ),
            }
            Ok(0)
        }
    }
}
