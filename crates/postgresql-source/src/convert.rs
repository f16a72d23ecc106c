//! PostgreSQL row to [`SourceRow`] conversion.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sync_core::{ColumnValue, SourceRow};
use tokio_postgres::types::Type;
use tokio_postgres::Row;

/// Convert a fetched PostgreSQL row into a [`SourceRow`] keyed by `id`.
///
/// Every column is kept, including the primary key column, in result
/// column order.
pub fn convert_row(row: &Row, id: i64) -> Result<SourceRow> {
    let mut columns = Vec::with_capacity(row.columns().len());
    for (i, column) in row.columns().iter().enumerate() {
        let value = convert_postgres_value(row, i).map_err(|e| {
            anyhow::anyhow!("Failed to convert column '{}' of id {id}: {e}", column.name())
        })?;
        columns.push((column.name().to_string(), value));
    }
    Ok(SourceRow::new(id, columns))
}

/// Convert a PostgreSQL value to a ColumnValue
fn convert_postgres_value(row: &Row, index: usize) -> Result<ColumnValue> {
    let column = &row.columns()[index];
    let pg_type = column.type_();

    let value = match *pg_type {
        Type::BOOL => row.try_get::<_, Option<bool>>(index)?.map(ColumnValue::Bool),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(index)?
            .map(|i| ColumnValue::Int(i as i64)),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(index)?
            .map(|i| ColumnValue::Int(i as i64)),
        Type::INT8 => row.try_get::<_, Option<i64>>(index)?.map(ColumnValue::Int),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)?
            .map(|f| ColumnValue::Float(f as f64)),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(index)?.map(ColumnValue::Float),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(index)?
            .map(ColumnValue::Decimal),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(index)?.map(ColumnValue::Text)
        }
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(index)?
            .map(ColumnValue::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(index)?
            .map(ColumnValue::TimestampTz),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(index)?
            .map(ColumnValue::Date),
        Type::TIME => row
            .try_get::<_, Option<NaiveTime>>(index)?
            .map(ColumnValue::Time),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(index)?
            .map(ColumnValue::Json),
        Type::UUID => row
            .try_get::<_, Option<uuid::Uuid>>(index)?
            .map(ColumnValue::Uuid),
        Type::BYTEA => row
            .try_get::<_, Option<Vec<u8>>>(index)?
            .map(ColumnValue::Bytes),
        _ => {
            // For unknown types, try to get as string
            match row.try_get::<_, Option<String>>(index) {
                Ok(val) => val.map(ColumnValue::Text),
                Err(_) => anyhow::bail!("Unsupported PostgreSQL type: {pg_type:?}"),
            }
        }
    };

    Ok(value.unwrap_or(ColumnValue::Null))
}
