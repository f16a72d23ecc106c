//! DynamoDB implementation of [`DocumentSink`].

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_dynamodb::Client;
use sync_core::{Document, DocumentSink};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::attribute::to_item;

/// DynamoDB target options
#[derive(Clone, Debug)]
pub struct TargetOpts {
    /// Destination table name
    pub table: String,
    /// AWS region
    pub region: String,
    /// Endpoint override, e.g. a local DynamoDB
    pub endpoint_url: Option<String>,
}

/// Writes documents with `PutItem`, which replaces the whole item stored
/// under the table's partition key. Replaying a document is therefore an
/// overwrite with identical content.
pub struct DynamoDbSink {
    opts: TargetOpts,
    credentials: SharedCredentialsProvider,
    client: OnceCell<Client>,
}

impl DynamoDbSink {
    /// Create a sink. Credentials are only resolved in `prepare`.
    pub fn new(opts: TargetOpts, credentials: SharedCredentialsProvider) -> Self {
        Self {
            opts,
            credentials,
            client: OnceCell::new(),
        }
    }

    pub fn opts(&self) -> &TargetOpts {
        &self.opts
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(self.opts.region.clone()))
                    .credentials_provider(self.credentials.clone());
                if let Some(endpoint) = &self.opts.endpoint_url {
                    loader = loader.endpoint_url(endpoint);
                }
                let sdk_config = loader.load().await;
                Client::new(&sdk_config)
            })
            .await
    }
}

#[async_trait::async_trait]
impl DocumentSink for DynamoDbSink {
    async fn prepare(&self) -> Result<()> {
        self.credentials
            .provide_credentials()
            .await
            .context("Failed to resolve DynamoDB credentials")?;
        self.client().await;
        Ok(())
    }

    async fn upsert(&self, document: &Document) -> Result<()> {
        let client = self.client().await;
        client
            .put_item()
            .table_name(&self.opts.table)
            .set_item(Some(to_item(document)))
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to put item {} into DynamoDB table {}",
                    document.id(),
                    self.opts.table
                )
            })?;

        debug!(
            "Put item {}={} into {}",
            document.key_field(),
            document.id(),
            self.opts.table
        );
        Ok(())
    }
}
