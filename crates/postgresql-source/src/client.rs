use anyhow::{Context, Result};
use tokio_postgres::{Client, NoTls};
use tracing::error;

/// Open a new PostgreSQL connection and drive it on a background task.
pub async fn new_postgresql_client(config: &tokio_postgres::Config) -> Result<Client> {
    let (client, connection) = config
        .connect(NoTls)
        .await
        .context("Failed to connect to PostgreSQL source")?;

    // Spawn connection handler
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {e}");
        }
    });

    Ok(client)
}

/// Quote a single SQL identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified name such as `netflix_historical.stock_prices`.
pub fn quote_qualified(name: &str) -> Result<String> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("Invalid table name '{name}': expected 'table' or 'schema.table'");
    }
    Ok(parts
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("id"), "\"id\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_qualified() {
        assert_eq!(
            quote_qualified("netflix_historical.stock_prices").unwrap(),
            "\"netflix_historical\".\"stock_prices\""
        );
        assert_eq!(quote_qualified("prices").unwrap(), "\"prices\"");
    }

    #[test]
    fn test_quote_qualified_invalid() {
        assert!(quote_qualified("").is_err());
        assert!(quote_qualified("a..b").is_err());
        assert!(quote_qualified("a.b.c").is_err());
    }
}
