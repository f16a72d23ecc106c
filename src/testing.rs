//! In-memory source and sink doubles for exercising the replication job
//! without PostgreSQL or DynamoDB.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use sync_core::{ColumnValue, Document, DocumentSink, FetchedRow, SourceReader, SourceRow};

/// A stock price row shaped like the rows the CLI usually replicates.
pub fn stock_row(id: i64) -> SourceRow {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(id.rem_euclid(3650) as u64)))
        .unwrap_or_default();
    SourceRow::builder("id", id)
        .column("stock_symbol", ColumnValue::Text("NFLX".to_string()))
        .column("date", ColumnValue::Date(date))
        .column("open_price", ColumnValue::Float(400.0 + id as f64 / 100.0))
        .column("close_price", ColumnValue::Float(401.0 + id as f64 / 100.0))
        .column("volume", ColumnValue::Int(1_000_000 + id))
        .build()
}

/// Source table held in memory, keyed by primary key.
#[derive(Default)]
pub struct MemorySource {
    rows: Mutex<BTreeMap<i64, SourceRow>>,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source pre-filled with `stock_row(id)` for every id in `ids`.
    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let source = Self::new();
        for id in ids {
            source.insert(stock_row(id));
        }
        source
    }

    pub fn insert(&self, row: SourceRow) {
        self.rows.lock().unwrap().insert(row.id, row);
    }

    pub fn remove(&self, id: i64) {
        self.rows.lock().unwrap().remove(&id);
    }

    /// Make subsequent fetches fail as if the database were unreachable.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent fetches take `delay` before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SourceReader for MemorySource {
    async fn fetch_batch(&self, start: i64, size: usize) -> Result<Vec<FetchedRow>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }

        let rows = self.rows.lock().unwrap();
        Ok((0..size as i64)
            .map(|offset| {
                let id = start + offset;
                match rows.get(&id) {
                    Some(row) => FetchedRow::present(id, row.clone()),
                    None => FetchedRow::absent(id),
                }
            })
            .collect())
    }
}

/// Key/value target held in memory, with put-overwrites-by-id semantics.
#[derive(Default)]
pub struct MemorySink {
    items: Mutex<HashMap<String, Document>>,
    fail_ids: Mutex<HashSet<String>>,
    fail_prepare: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    prepares: AtomicUsize,
    upserts: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes of document `id` fail.
    pub fn fail_on(&self, id: &str) {
        self.fail_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_ids.lock().unwrap().clear();
    }

    /// Make credential resolution fail.
    pub fn set_fail_prepare(&self, fail: bool) {
        self.fail_prepare.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *self.write_delay.lock().unwrap() = delay;
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.items.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored ids, sorted numerically.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .items
            .lock()
            .unwrap()
            .keys()
            .filter_map(|id| id.parse().ok())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of all stored items.
    pub fn snapshot(&self) -> HashMap<String, Document> {
        self.items.lock().unwrap().clone()
    }

    /// Every successful upsert, in call order.
    pub fn upserted(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn prepare_count(&self) -> usize {
        self.prepares.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentSink for MemorySink {
    async fn prepare(&self) -> Result<()> {
        self.prepares.fetch_add(1, Ordering::SeqCst);
        if self.fail_prepare.load(Ordering::SeqCst) {
            anyhow::bail!("no credentials found in secret store");
        }
        Ok(())
    }

    async fn upsert(&self, document: &Document) -> Result<()> {
        let delay = *self.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_ids.lock().unwrap().contains(document.id()) {
            anyhow::bail!("write rejected for id {}", document.id());
        }
        self.items
            .lock()
            .unwrap()
            .insert(document.id().to_string(), document.clone());
        self.upserts.lock().unwrap().push(document.id().to_string());
        Ok(())
    }
}
