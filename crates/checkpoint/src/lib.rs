//! Cursor management for pg-dynamo-sync
//!
//! Persists the single integer replication cursor (the next primary key
//! value to fetch) in a named slot, durably across process restarts.
//!
//! # Architecture
//!
//! This crate provides:
//! - The `CursorStore` trait with read/write as its only operations
//! - `StoredCursor`, the persisted record of a slot
//! - `CheckpointStorage`, the backend selection used by the CLI
//!
//! ## Storage Backends
//!
//! - `FilesystemStore` - Stores each slot as a JSON file
//! - `PostgresStore` - Stores slots in a PostgreSQL table
//! - `MemoryStore` - Keeps slots in process memory (tests)
//!
//! A slot that was never written reads as `None`, which
//! `CursorStore::load_cursor` turns into cursor 0.

mod config;
mod filesystem;
mod memory;
mod postgresql;
pub mod store;


// Re-export config types
pub use config::{CheckpointStorage, DEFAULT_CHECKPOINT_DIR, DEFAULT_CURSOR_NAME};

// Re-export store trait and types
pub use store::{CursorStore, StoredCursor};

// Re-export storage implementations
pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;
pub use postgresql::{PostgresStore, DEFAULT_CHECKPOINT_TABLE};
