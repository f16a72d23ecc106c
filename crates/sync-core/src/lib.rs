//! Core types for pg-dynamo-sync.
//!
//! This crate provides the types shared by the source reader, the target
//! writer and the replication job:
//!
//! - [`SourceRow`] / [`ColumnValue`] - typed relational rows
//! - [`Document`] / [`DocumentValue`] - document-store items
//! - [`RowCodec`] - the row to document transformation
//! - [`SourceReader`] / [`DocumentSink`] - the seams the job is generic over
//!
//! # Architecture
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── postgresql-source  (implements SourceReader)
//!    ├─── dynamodb-sink      (implements DocumentSink)
//!    └─── pg-dynamo-sync     (ReplicationJob over both)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sync_core::{ColumnValue, DocumentValue, RowCodec, SourceRow};
//!
//! let row = SourceRow::builder("id", 42)
//!     .column("stock_symbol", ColumnValue::Text("NFLX".to_string()))
//!     .build();
//!
//! let doc = RowCodec::new("id").encode(&row);
//! assert_eq!(doc.get("id"), Some(&DocumentValue::String("42".to_string())));
//! ```

pub mod codec;
pub mod document;
pub mod traits;
pub mod values;

pub use codec::{encode_value, RowCodec};
pub use document::{Document, DocumentValue};
pub use traits::{DocumentSink, FetchedRow, SourceReader};
pub use values::{ColumnValue, SourceRow, SourceRowBuilder};
