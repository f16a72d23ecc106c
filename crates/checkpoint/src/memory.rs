//! In-memory cursor storage for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::store::{CursorStore, StoredCursor};

/// Process-local CursorStore. Not durable.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, StoredCursor>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `name` already set to `next_id`.
    pub fn with_cursor(name: &str, next_id: i64) -> Self {
        let mut slots = HashMap::new();
        slots.insert(name.to_string(), StoredCursor::new(name, next_id));
        Self {
            slots: Mutex::new(slots),
            ..Self::default()
        }
    }

    /// Current value of a slot, if set.
    pub async fn get(&self, name: &str) -> Option<i64> {
        self.slots.lock().await.get(name).map(|c| c.next_id)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CursorStore for MemoryStore {
    async fn read_cursor(&self, name: &str) -> Result<Option<StoredCursor>> {
        Ok(self.slots.lock().await.get(name).cloned())
    }

    async fn write_cursor(&self, name: &str, next_id: i64) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("Injected cursor write failure for '{name}'");
        }
        self.slots
            .lock()
            .await
            .insert(name.to_string(), StoredCursor::new(name, next_id));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
