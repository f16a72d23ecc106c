//! Failure taxonomy of a replication run.

/// Why a run ended in `Failed`.
///
/// Every variant leaves the cursor at its pre-run value, so the next run
/// retries the same window. Timeouts surface as the `Fetch` or `Write`
/// variant of the step that timed out.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    /// The cursor could not be read
    #[error("Failed to read cursor '{name}': {error:#}")]
    CheckpointRead { name: String, error: anyhow::Error },

    /// The source was unreachable or a lookup failed
    #[error("Failed to fetch batch starting at id {start}: {error:#}")]
    Fetch { start: i64, error: anyhow::Error },

    /// Target store credentials could not be obtained; nothing was written
    #[error("Failed to resolve target credentials: {error:#}")]
    Credentials { error: anyhow::Error },

    /// The target rejected or did not acknowledge the write for `id`
    #[error("Failed to write id {id} (offset {offset} from {start}): {error:#}")]
    Write {
        id: i64,
        start: i64,
        offset: i64,
        error: anyhow::Error,
    },

    /// All rows were written but the advanced cursor could not be stored
    #[error("Failed to store cursor '{name}' = {next_id}: {error:#}")]
    CheckpointWrite {
        name: String,
        next_id: i64,
        error: anyhow::Error,
    },
}

impl ReplicationError {
    /// Short machine-friendly label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CheckpointRead { .. } => "checkpoint_read",
            Self::Fetch { .. } => "fetch",
            Self::Credentials { .. } => "credentials",
            Self::Write { .. } => "write",
            Self::CheckpointWrite { .. } => "checkpoint_write",
        }
    }
}
