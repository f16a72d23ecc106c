use anyhow::Context;
use checkpoint::{CheckpointStorage, CursorStore, FilesystemStore, PostgresStore};
use dynamodb_sink::{CredentialSource, DynamoDbSink, TargetOpts};
use postgresql_source::{PostgresSource, SourceOpts};

use crate::job::{JobConfig, ReplicationJob};

/// The job as wired by the CLI.
pub type PostgresToDynamoJob = ReplicationJob<PostgresSource, DynamoDbSink, Box<dyn CursorStore>>;

// Open the configured cursor store; the postgresql backend lives in the source database
pub async fn open_cursor_store(
    storage: &CheckpointStorage,
    source_opts: &SourceOpts,
) -> anyhow::Result<Box<dyn CursorStore>> {
    match storage {
        CheckpointStorage::Filesystem { dir } => Ok(Box::new(FilesystemStore::new(dir))),
        CheckpointStorage::PostgreSQL { table } => {
            let store = PostgresStore::connect(source_opts.pg_config(), table)
                .await
                .with_context(|| format!("Failed to open checkpoint table '{table}'"))?;
            Ok(Box::new(store))
        }
    }
}

pub async fn build_job(
    source_opts: SourceOpts,
    target_opts: TargetOpts,
    credentials: CredentialSource,
    storage: &CheckpointStorage,
    config: JobConfig,
) -> anyhow::Result<PostgresToDynamoJob> {
    let store = open_cursor_store(storage, &source_opts).await?;
    let source = PostgresSource::new(source_opts)?;
    let provider = credentials.into_provider(&target_opts.region).await;
    let sink = DynamoDbSink::new(target_opts, provider);
    tracing::debug!(
        "Replicating {} into DynamoDB table {} with cursor at {}",
        source.opts().table,
        sink.opts().table,
        storage.describe()
    );
    ReplicationJob::new(source, sink, store, config)
}
