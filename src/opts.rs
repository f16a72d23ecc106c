//! Command-line option groups.
//!
//! Each group is flattened into the subcommands that need it and converted
//! into the options type of the crate that consumes it.

use std::time::Duration;

use checkpoint::{
    CheckpointStorage, DEFAULT_CHECKPOINT_DIR, DEFAULT_CHECKPOINT_TABLE, DEFAULT_CURSOR_NAME,
};
use clap::{Args, ValueEnum};
use dynamodb_sink::{CredentialSource, TargetOpts};
use postgresql_source::SourceOpts;

use crate::config::parse_duration;
use crate::job::{JobConfig, DEFAULT_BATCH_SIZE};

/// PostgreSQL source options
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// PostgreSQL host
    #[arg(long, default_value = "localhost", env = "PGHOST")]
    pub pg_host: String,

    /// PostgreSQL port
    #[arg(long, default_value_t = 5432, env = "PGPORT")]
    pub pg_port: u16,

    /// PostgreSQL user
    #[arg(long, default_value = "postgres", env = "PGUSER")]
    pub pg_user: String,

    /// PostgreSQL password
    #[arg(long, default_value = "", env = "PGPASSWORD", hide_env_values = true)]
    pub pg_password: String,

    /// PostgreSQL database name
    #[arg(long, default_value = "postgres", env = "PGDATABASE")]
    pub pg_database: String,

    /// Source table, optionally schema-qualified (e.g. netflix_historical.stock_prices)
    #[arg(long, env = "SOURCE_TABLE")]
    pub source_table: String,

    /// Integer primary key column of the source table
    #[arg(long, default_value = "id")]
    pub id_column: String,

    /// Connection timeout (e.g. "10s")
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub connect_timeout: Duration,
}

impl From<&SourceArgs> for SourceOpts {
    fn from(args: &SourceArgs) -> Self {
        Self {
            host: args.pg_host.clone(),
            port: args.pg_port,
            user: args.pg_user.clone(),
            password: args.pg_password.clone(),
            database: args.pg_database.clone(),
            table: args.source_table.clone(),
            id_column: args.id_column.clone(),
            connect_timeout: args.connect_timeout,
        }
    }
}

/// DynamoDB target options
#[derive(Args, Clone, Debug)]
pub struct TargetArgs {
    /// Destination DynamoDB table
    #[arg(long, env = "DYNAMODB_TABLE")]
    pub dynamodb_table: String,

    /// AWS region of the table
    #[arg(long, default_value = "us-east-1", env = "AWS_REGION")]
    pub aws_region: String,

    /// Endpoint override, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long, env = "DYNAMODB_ENDPOINT")]
    pub dynamodb_endpoint: Option<String>,

    /// Access key id; when omitted the default AWS credential chain is used
    #[arg(long, requires = "aws_secret_access_key")]
    pub aws_access_key_id: Option<String>,

    /// Secret access key paired with --aws-access-key-id
    #[arg(long, requires = "aws_access_key_id")]
    pub aws_secret_access_key: Option<String>,

    /// Optional session token for temporary credentials
    #[arg(long, requires = "aws_access_key_id")]
    pub aws_session_token: Option<String>,
}

impl TargetArgs {
    pub fn target_opts(&self) -> TargetOpts {
        TargetOpts {
            table: self.dynamodb_table.clone(),
            region: self.aws_region.clone(),
            endpoint_url: self.dynamodb_endpoint.clone(),
        }
    }

    pub fn credential_source(&self) -> CredentialSource {
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                session_token: self.aws_session_token.clone(),
            },
            _ => CredentialSource::DefaultChain,
        }
    }
}

/// Cursor storage backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CheckpointBackend {
    /// JSON file per cursor slot
    #[value(name = "filesystem")]
    Filesystem,
    /// Table in the source PostgreSQL database
    #[value(name = "postgresql")]
    PostgreSQL,
}

/// Cursor storage options
#[derive(Args, Clone, Debug)]
pub struct CheckpointArgs {
    /// Where the cursor is persisted
    #[arg(long, value_enum, default_value = "filesystem")]
    pub checkpoint_backend: CheckpointBackend,

    /// Directory for the filesystem backend
    #[arg(long, default_value = DEFAULT_CHECKPOINT_DIR)]
    pub checkpoint_dir: String,

    /// Table for the postgresql backend
    #[arg(long, default_value = DEFAULT_CHECKPOINT_TABLE)]
    pub checkpoint_table: String,

    /// Cursor slot name
    #[arg(long, default_value = DEFAULT_CURSOR_NAME)]
    pub checkpoint_name: String,
}

impl CheckpointArgs {
    pub fn storage(&self) -> CheckpointStorage {
        match self.checkpoint_backend {
            CheckpointBackend::Filesystem => CheckpointStorage::Filesystem {
                dir: self.checkpoint_dir.clone(),
            },
            CheckpointBackend::PostgreSQL => CheckpointStorage::PostgreSQL {
                table: self.checkpoint_table.clone(),
            },
        }
    }
}

/// Batch options
#[derive(Args, Clone, Debug)]
pub struct JobArgs {
    /// Number of ids probed per run
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Upper bound on fetching one batch (e.g. "30s"); unbounded if omitted
    #[arg(long, value_parser = parse_duration)]
    pub fetch_timeout: Option<Duration>,

    /// Upper bound on writing one row (e.g. "5s"); unbounded if omitted
    #[arg(long, value_parser = parse_duration)]
    pub write_timeout: Option<Duration>,
}

impl JobArgs {
    pub fn job_config(&self, checkpoint: &CheckpointArgs, source: &SourceArgs) -> JobConfig {
        JobConfig {
            batch_size: self.batch_size,
            checkpoint_name: checkpoint.checkpoint_name.clone(),
            id_column: source.id_column.clone(),
            fetch_timeout: self.fetch_timeout,
            write_timeout: self.write_timeout,
        }
    }
}
