//! Target-side document representation.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A document-store native value.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Binary(Vec<u8>),
    List(Vec<DocumentValue>),
    Map(BTreeMap<String, DocumentValue>),
}

/// A document keyed by its string identifier.
///
/// The identifier is always present in the field map under `key_field`,
/// so writing `fields()` as a whole item carries the key along.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    key_field: String,
    id: String,
    fields: BTreeMap<String, DocumentValue>,
}

impl Document {
    /// Create a document, inserting `id` under `key_field`.
    pub fn new(
        key_field: impl Into<String>,
        id: impl Into<String>,
        mut fields: BTreeMap<String, DocumentValue>,
    ) -> Self {
        let key_field = key_field.into();
        let id = id.into();
        fields.insert(key_field.clone(), DocumentValue::String(id.clone()));
        Self {
            key_field,
            id,
            fields,
        }
    }

    /// Document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the field holding the identifier.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// All fields, including the key field.
    pub fn fields(&self) -> &BTreeMap<String, DocumentValue> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&DocumentValue> {
        self.fields.get(name)
    }
}
