//! Credential provider construction.
//!
//! The sink only ever sees an opaque [`SharedCredentialsProvider`]; this
//! module turns the caller's configuration into one.

use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::Region;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;

const PROVIDER_NAME: &str = "pg-dynamo-sync";

/// Where DynamoDB credentials come from.
#[derive(Clone)]
pub enum CredentialSource {
    /// The standard AWS chain (environment, profile, web identity, IMDS, ...)
    DefaultChain,

    /// Explicit keys, e.g. pulled from a secret store by the caller
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultChain => write!(f, "DefaultChain"),
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
        }
    }
}

impl CredentialSource {
    /// Build the provider. Nothing is resolved until the provider is asked.
    pub async fn into_provider(self, region: &str) -> SharedCredentialsProvider {
        match self {
            Self::DefaultChain => {
                let chain = DefaultCredentialsChain::builder()
                    .region(Region::new(region.to_string()))
                    .build()
                    .await;
                SharedCredentialsProvider::new(chain)
            }
            Self::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => SharedCredentialsProvider::new(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token,
                None,
                PROVIDER_NAME,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::ProvideCredentials;

    #[tokio::test]
    async fn test_static_provider_resolves() {
        let provider = CredentialSource::Static {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        }
        .into_provider("us-east-1")
        .await;

        let creds = provider.provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDEXAMPLE");
        assert_eq!(creds.secret_access_key(), "secret");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        let source = CredentialSource::Static {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "very-secret".to_string(),
            session_token: Some("token".to_string()),
        };
        let rendered = format!("{source:?}");
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("token"));
    }
}
