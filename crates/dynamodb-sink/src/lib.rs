//! DynamoDB sink for pg-dynamo-sync.
//!
//! Implements [`sync_core::DocumentSink`] with keyed `PutItem` writes. The
//! destination table's partition key must be the document key field
//! (a string attribute).

mod attribute;
mod credentials;
mod sink;

pub use attribute::{to_attribute_value, to_item};
pub use credentials::CredentialSource;
pub use sink::{DynamoDbSink, TargetOpts};
