//! Row codec: relational row to document.
//!
//! Encoding is a pure, total function. The primary key becomes its decimal
//! string form, dates and timestamps become ISO-8601 strings, and every
//! other value keeps its native scalar shape.

use chrono::SecondsFormat;
use std::collections::BTreeMap;

use crate::document::{Document, DocumentValue};
use crate::values::{ColumnValue, SourceRow};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Converts [`SourceRow`]s into [`Document`]s.
#[derive(Debug, Clone)]
pub struct RowCodec {
    id_column: String,
}

impl RowCodec {
    /// Create a codec for rows whose primary key column is `id_column`.
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
        }
    }

    /// Encode a row. The resulting document's key field is the id column.
    pub fn encode(&self, row: &SourceRow) -> Document {
        let fields = row
            .columns
            .iter()
            .filter(|(name, _)| *name != self.id_column)
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect::<BTreeMap<_, _>>();

        Document::new(self.id_column.clone(), row.id.to_string(), fields)
    }
}

/// Encode a single non-key column value.
pub fn encode_value(value: &ColumnValue) -> DocumentValue {
    match value {
        ColumnValue::Null => DocumentValue::Null,
        ColumnValue::Bool(b) => DocumentValue::Bool(*b),
        ColumnValue::Int(i) => DocumentValue::Int(*i),
        ColumnValue::Float(f) => DocumentValue::Float(*f),
        ColumnValue::Decimal(d) => DocumentValue::Decimal(*d),
        ColumnValue::Text(s) => DocumentValue::String(s.clone()),
        ColumnValue::Bytes(b) => DocumentValue::Binary(b.clone()),
        ColumnValue::Uuid(u) => DocumentValue::String(u.to_string()),
        ColumnValue::Json(json) => json_to_value(json),
        ColumnValue::Date(d) => DocumentValue::String(d.format(DATE_FORMAT).to_string()),
        ColumnValue::Time(t) => DocumentValue::String(t.format(TIME_FORMAT).to_string()),
        ColumnValue::Timestamp(ts) => {
            DocumentValue::String(ts.format(TIMESTAMP_FORMAT).to_string())
        }
        ColumnValue::TimestampTz(dt) => {
            DocumentValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
        }
    }
}

/// Convert JSON value to a document value
fn json_to_value(value: &serde_json::Value) -> DocumentValue {
    match value {
        serde_json::Value::Null => DocumentValue::Null,
        serde_json::Value::Bool(b) => DocumentValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DocumentValue::Int(i)
            } else if let Ok(d) = n.to_string().parse::<rust_decimal::Decimal>() {
                DocumentValue::Decimal(d)
            } else if let Some(f) = n.as_f64() {
                DocumentValue::Float(f)
            } else {
                DocumentValue::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => DocumentValue::String(s.clone()),
        serde_json::Value::Array(arr) => {
            DocumentValue::List(arr.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => DocumentValue::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
        ),
    }
}
