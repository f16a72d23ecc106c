//! Document to DynamoDB attribute conversion.

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use sync_core::{Document, DocumentValue};

/// Convert a document into a DynamoDB item.
pub fn to_item(document: &Document) -> HashMap<String, AttributeValue> {
    document
        .fields()
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

/// Convert a single document value. Numbers travel as their decimal text.
pub fn to_attribute_value(value: &DocumentValue) -> AttributeValue {
    match value {
        DocumentValue::Null => AttributeValue::Null(true),
        DocumentValue::Bool(b) => AttributeValue::Bool(*b),
        DocumentValue::Int(i) => AttributeValue::N(i.to_string()),
        DocumentValue::Float(f) => AttributeValue::N(f.to_string()),
        DocumentValue::Decimal(d) => AttributeValue::N(d.to_string()),
        DocumentValue::String(s) => AttributeValue::S(s.clone()),
        DocumentValue::Binary(b) => AttributeValue::B(Blob::new(b.clone())),
        DocumentValue::List(items) => {
            AttributeValue::L(items.iter().map(to_attribute_value).collect())
        }
        DocumentValue::Map(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    #[test]
    fn test_item_carries_string_key() {
        let mut fields = BTreeMap::new();
        fields.insert("date".to_string(), DocumentValue::String("2024-01-05".into()));
        fields.insert("volume".to_string(), DocumentValue::Int(3_254_100));
        fields.insert("close_price".to_string(), DocumentValue::Float(474.5));
        let doc = Document::new("id", "42", fields);

        let item = to_item(&doc);

        assert_eq!(item.len(), 4);
        assert_eq!(item.get("id"), Some(&AttributeValue::S("42".to_string())));
        assert_eq!(
            item.get("date"),
            Some(&AttributeValue::S("2024-01-05".to_string()))
        );
        assert_eq!(
            item.get("volume"),
            Some(&AttributeValue::N("3254100".to_string()))
        );
        assert_eq!(
            item.get("close_price"),
            Some(&AttributeValue::N("474.5".to_string()))
        );
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(
            to_attribute_value(&DocumentValue::Null),
            AttributeValue::Null(true)
        );
        assert_eq!(
            to_attribute_value(&DocumentValue::Bool(false)),
            AttributeValue::Bool(false)
        );
        assert_eq!(
            to_attribute_value(&DocumentValue::Decimal(Decimal::from_str("12.50").unwrap())),
            AttributeValue::N("12.50".to_string())
        );
        assert_eq!(
            to_attribute_value(&DocumentValue::Binary(vec![0xde, 0xad])),
            AttributeValue::B(Blob::new(vec![0xde, 0xad]))
        );
    }

    #[test]
    fn test_nested_conversions() {
        let mut inner = BTreeMap::new();
        inner.insert("ok".to_string(), DocumentValue::Bool(true));
        let value = DocumentValue::List(vec![
            DocumentValue::Int(1),
            DocumentValue::Map(inner),
        ]);

        let AttributeValue::L(items) = to_attribute_value(&value) else {
            panic!("expected list");
        };
        assert_eq!(items[0], AttributeValue::N("1".to_string()));
        let AttributeValue::M(map) = &items[1] else {
            panic!("expected map");
        };
        assert_eq!(map.get("ok"), Some(&AttributeValue::Bool(true)));
    }
}
