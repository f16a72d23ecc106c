//! PostgreSQL source for pg-dynamo-sync
//!
//! Reads fixed-size windows of a table by exact primary key lookup and
//! converts each found row into a [`sync_core::SourceRow`].

mod client;
mod convert;
mod reader;

pub use client::{new_postgresql_client, quote_ident, quote_qualified};
pub use convert::convert_row;
pub use reader::PostgresSource;

use std::time::Duration;

/// PostgreSQL source connection options
#[derive(Clone, Debug)]
pub struct SourceOpts {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name
    pub database: String,
    /// Source table, optionally schema-qualified (`schema.table`)
    pub table: String,
    /// Integer primary key column
    pub id_column: String,
    /// Upper bound on establishing a connection
    pub connect_timeout: Duration,
}

impl SourceOpts {
    /// Build a `tokio_postgres::Config` from these options.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database)
            .connect_timeout(self.connect_timeout);
        config
    }
}
