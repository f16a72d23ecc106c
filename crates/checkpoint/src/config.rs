//! Cursor storage configuration.

/// Default cursor slot name.
pub const DEFAULT_CURSOR_NAME: &str = "last_index";

/// Default directory for the filesystem backend.
pub const DEFAULT_CHECKPOINT_DIR: &str = ".pg-dynamo-sync-checkpoints";

/// Where the replication cursor is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointStorage {
    /// One JSON file per slot under `dir`.
    Filesystem { dir: String },

    /// One row per slot in `table` of the source PostgreSQL database.
    PostgreSQL { table: String },
}

impl Default for CheckpointStorage {
    fn default() -> Self {
        Self::Filesystem {
            dir: DEFAULT_CHECKPOINT_DIR.to_string(),
        }
    }
}

impl CheckpointStorage {
    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Filesystem { dir } => format!("filesystem:{dir}"),
            Self::PostgreSQL { table } => format!("postgresql:{table}"),
        }
    }
}
