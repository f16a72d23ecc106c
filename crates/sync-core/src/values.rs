//! Source-side value representations.
//!
//! A [`SourceRow`] is one relational tuple as read from the source table,
//! keyed by its integer primary key. Column values keep their source type
//! so the row codec can decide how each one is rendered in the document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single typed column value read from the relational source.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// SQL NULL
    Null,

    /// Boolean value
    Bool(bool),

    /// Any integer column (smallint/int/bigint widened to 64 bits)
    Int(i64),

    /// Floating point column (real/double precision)
    Float(f64),

    /// Exact numeric column
    Decimal(Decimal),

    /// Text-like column (text, varchar, char, name)
    Text(String),

    /// Binary column
    Bytes(Vec<u8>),

    /// UUID column
    Uuid(Uuid),

    /// JSON or JSONB column
    Json(serde_json::Value),

    /// Calendar date without time
    Date(NaiveDate),

    /// Time of day without date
    Time(NaiveTime),

    /// Timestamp without time zone
    Timestamp(NaiveDateTime),

    /// Timestamp with time zone, normalized to UTC
    TimestampTz(DateTime<Utc>),
}

/// One row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// Primary key value
    pub id: i64,

    /// Column name and value pairs, in source column order
    pub columns: Vec<(String, ColumnValue)>,
}

impl SourceRow {
    /// Create a new source row.
    pub fn new(id: i64, columns: Vec<(String, ColumnValue)>) -> Self {
        Self { id, columns }
    }

    /// Start building a row whose primary key lives in `id_column`.
    ///
    /// The id column itself is added as the first column.
    pub fn builder(id_column: impl Into<String>, id: i64) -> SourceRowBuilder {
        SourceRowBuilder {
            id,
            columns: vec![(id_column.into(), ColumnValue::Int(id))],
        }
    }

    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }
}

/// Builder for `SourceRow`.
pub struct SourceRowBuilder {
    id: i64,
    columns: Vec<(String, ColumnValue)>,
}

impl SourceRowBuilder {
    /// Add a column to the row.
    pub fn column(mut self, name: impl Into<String>, value: ColumnValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    /// Build the row.
    pub fn build(self) -> SourceRow {
        SourceRow {
            id: self.id,
            columns: self.columns,
        }
    }
}
