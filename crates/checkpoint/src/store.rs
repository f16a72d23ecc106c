//! Cursor storage trait and types
//!
//! This module defines the CursorStore trait for backend-agnostic
//! cursor storage operations, plus shared types.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cursor data stored in backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCursor {
    /// Slot name (e.g., "last_index")
    pub name: String,
    /// Lowest primary key value not yet attempted
    pub next_id: i64,
    /// Timestamp of the last write
    pub updated_at: DateTime<Utc>,
}

impl StoredCursor {
    pub fn new(name: impl Into<String>, next_id: i64) -> Self {
        Self {
            name: name.into(),
            next_id,
            updated_at: Utc::now(),
        }
    }
}

/// Trait for cursor storage operations.
///
/// This trait abstracts the storage backend for the replication cursor,
/// allowing the same job logic to work with:
/// - Filesystem storage (`FilesystemStore`)
/// - PostgreSQL (`PostgresStore`)
/// - Process memory (`MemoryStore`, tests only)
///
/// Stores provide no mutual exclusion of their own. At most one run may
/// read-modify-write a given slot at a time; the caller enforces that.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Read a cursor from the storage backend.
    ///
    /// Returns None if the slot has never been written.
    async fn read_cursor(&self, name: &str) -> Result<Option<StoredCursor>>;

    /// Durably store a cursor value in the named slot.
    async fn write_cursor(&self, name: &str, next_id: i64) -> Result<()>;

    /// Read the cursor value, defaulting to 0 for a slot never written.
    async fn load_cursor(&self, name: &str) -> Result<i64> {
        match self.read_cursor(name).await? {
            Some(stored) if stored.next_id < 0 => Err(anyhow::anyhow!(
                "Cursor '{name}' holds negative value {}",
                stored.next_id
            )),
            Some(stored) => Ok(stored.next_id),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl<T: CursorStore + ?Sized> CursorStore for Box<T> {
    async fn read_cursor(&self, name: &str) -> Result<Option<StoredCursor>> {
        (**self).read_cursor(name).await
    }

    async fn write_cursor(&self, name: &str, next_id: i64) -> Result<()> {
        (**self).write_cursor(name, next_id).await
    }
}
