use std::time::Duration;

use checkpoint::{CheckpointStorage, CursorStore, FilesystemStore, DEFAULT_CURSOR_NAME};
use clap::Parser;
use dynamodb_sink::CredentialSource;
use pg_dynamo_sync::opts::{CheckpointArgs, CheckpointBackend, JobArgs, SourceArgs, TargetArgs};
use pg_dynamo_sync::testing::{MemorySink, MemorySource};
use pg_dynamo_sync::{ReplicationJob, RunOutcome, DEFAULT_BATCH_SIZE};
use postgresql_source::SourceOpts;

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    checkpoint: CheckpointArgs,

    #[command(flatten)]
    job: JobArgs,
}

fn parse(args: &[&str]) -> TestCli {
    let mut argv = vec!["pg-dynamo-sync"];
    argv.extend_from_slice(args);
    TestCli::try_parse_from(argv).unwrap()
}

const REQUIRED: [&str; 4] = [
    "--source-table",
    "netflix_historical.stock_prices",
    "--dynamodb-table",
    "stock_prices",
];

#[test]
fn test_defaults() {
    let cli = parse(&REQUIRED);

    assert_eq!(cli.job.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(cli.job.fetch_timeout, None);
    assert_eq!(cli.checkpoint.checkpoint_backend, CheckpointBackend::Filesystem);
    assert_eq!(cli.checkpoint.checkpoint_name, DEFAULT_CURSOR_NAME);
    assert_eq!(cli.checkpoint.storage(), CheckpointStorage::default());
    assert!(matches!(
        cli.target.credential_source(),
        CredentialSource::DefaultChain
    ));

    let config = cli.job.job_config(&cli.checkpoint, &cli.source);
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.checkpoint_name, "last_index");
    assert_eq!(config.id_column, "id");
}

#[test]
fn test_source_opts_from_args() {
    let mut args = REQUIRED.to_vec();
    args.extend([
        "--pg-host",
        "db.internal",
        "--pg-port",
        "6543",
        "--id-column",
        "price_id",
        "--connect-timeout",
        "3s",
    ]);
    let cli = parse(&args);

    let opts = SourceOpts::from(&cli.source);
    assert_eq!(opts.host, "db.internal");
    assert_eq!(opts.port, 6543);
    assert_eq!(opts.table, "netflix_historical.stock_prices");
    assert_eq!(opts.id_column, "price_id");
    assert_eq!(opts.connect_timeout, Duration::from_secs(3));
}

#[test]
fn test_job_and_checkpoint_flags() {
    let mut args = REQUIRED.to_vec();
    args.extend([
        "--batch-size",
        "250",
        "--fetch-timeout",
        "30s",
        "--write-timeout",
        "500ms",
        "--checkpoint-backend",
        "postgresql",
        "--checkpoint-name",
        "stock_prices",
    ]);
    let cli = parse(&args);

    let config = cli.job.job_config(&cli.checkpoint, &cli.source);
    assert_eq!(config.batch_size, 250);
    assert_eq!(config.fetch_timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.write_timeout, Some(Duration::from_millis(500)));
    assert_eq!(config.checkpoint_name, "stock_prices");
    assert_eq!(
        cli.checkpoint.storage(),
        CheckpointStorage::PostgreSQL {
            table: "sync_checkpoints".to_string()
        }
    );
}

#[test]
fn test_static_credentials_and_endpoint() {
    let mut args = REQUIRED.to_vec();
    args.extend([
        "--aws-access-key-id",
        "AKIDEXAMPLE",
        "--aws-secret-access-key",
        "secret",
        "--dynamodb-endpoint",
        "http://localhost:8000",
        "--aws-region",
        "eu-west-1",
    ]);
    let cli = parse(&args);

    let target = cli.target.target_opts();
    assert_eq!(target.table, "stock_prices");
    assert_eq!(target.region, "eu-west-1");
    assert_eq!(target.endpoint_url.as_deref(), Some("http://localhost:8000"));
    match cli.target.credential_source() {
        CredentialSource::Static {
            access_key_id,
            session_token,
            ..
        } => {
            assert_eq!(access_key_id, "AKIDEXAMPLE");
            assert_eq!(session_token, None);
        }
        other => panic!("expected static credentials, got {other:?}"),
    }
}

#[test]
fn test_access_key_without_secret_is_rejected() {
    let mut argv = vec!["pg-dynamo-sync"];
    argv.extend_from_slice(&REQUIRED);
    argv.extend(["--aws-access-key-id", "AKIDEXAMPLE"]);
    assert!(TestCli::try_parse_from(argv).is_err());
}

#[test]
fn test_invalid_duration_is_rejected() {
    let mut argv = vec!["pg-dynamo-sync"];
    argv.extend_from_slice(&REQUIRED);
    argv.extend(["--fetch-timeout", "soon"]);
    assert!(TestCli::try_parse_from(argv).is_err());
}

#[test]
fn test_filesystem_cursor_survives_job_restart() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cli = parse(&[
        "--source-table",
        "stock_prices",
        "--dynamodb-table",
        "stock_prices",
        "--checkpoint-dir",
        temp_dir.path().to_str().unwrap(),
    ]);
    let config = cli.job.job_config(&cli.checkpoint, &cli.source);

    let first = ReplicationJob::new(
        MemorySource::with_ids(0..150),
        MemorySink::new(),
        FilesystemStore::new(&cli.checkpoint.checkpoint_dir),
        config.clone(),
    )
    .unwrap();
    let outcome = tokio_test::block_on(first.run_once());
    assert!(matches!(outcome, RunOutcome::Advanced { count: 100, .. }));
    drop(first);

    let second = ReplicationJob::new(
        MemorySource::with_ids(0..150),
        MemorySink::new(),
        FilesystemStore::new(&cli.checkpoint.checkpoint_dir),
        config,
    )
    .unwrap();
    let outcome = tokio_test::block_on(second.run_once());
    assert!(matches!(
        outcome,
        RunOutcome::Advanced {
            count: 50,
            next_id: 200
        }
    ));
    assert_eq!(second.sink().ids(), (100..150).collect::<Vec<_>>());

    let stored = tokio_test::block_on(second.store().read_cursor(DEFAULT_CURSOR_NAME))
        .unwrap()
        .unwrap();
    assert_eq!(stored.next_id, 200);
}
