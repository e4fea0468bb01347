//! The query gateway.
//!
//! Turns the four exposed operations into SQL statements against the
//! configured database and renders their results as text. Every operation
//! opens its own session, runs exactly one statement and closes the session
//! before returning, whatever the outcome.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::ConnectionConfig;
use crate::db::{Connector, MySqlConnector, ResultSet};
use crate::error::Result;
use crate::format::{self, ColumnDescriptor};

/// Runs statements against one database through short-lived sessions.
#[derive(Clone)]
pub struct QueryGateway {
    connector: Arc<dyn Connector>,
}

impl QueryGateway {
    /// Creates a gateway backed by MySQL.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(Arc::new(MySqlConnector::new(config)))
    }

    /// Creates a gateway backed by an arbitrary connector.
    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Lists all databases on the server, one name per line.
    pub async fn list_databases(&self) -> Result<String> {
        let result = self.run("SHOW DATABASES").await?;
        Ok(format::name_list(&result))
    }

    /// Lists the tables of the configured database, one name per line.
    pub async fn list_tables(&self) -> Result<String> {
        let result = self.run("SHOW TABLES").await?;
        Ok(format::name_list(&result))
    }

    /// Executes a caller-supplied statement verbatim.
    ///
    /// The statement is not validated or parameterised; callers are trusted.
    pub async fn execute_query(&self, query: &str) -> Result<String> {
        let result = self.run(query).await?;
        Ok(format::result_table(&result))
    }

    /// Describes the columns of a table.
    ///
    /// `table_name` is interpolated into the statement as-is, so it must not
    /// come from untrusted input.
    pub async fn get_table_schema(&self, table_name: &str) -> Result<String> {
        let result = self.run(&format!("DESCRIBE {table_name}")).await?;
        let columns = ColumnDescriptor::from_describe(&result);
        Ok(format::table_schema(table_name, &columns))
    }

    /// Opens a session, runs one statement and closes the session.
    ///
    /// The close happens on every path once a session exists; a failure to
    /// close is logged and never replaces the statement's own outcome.
    async fn run(&self, sql: &str) -> Result<ResultSet> {
        let mut session = self.connector.connect().await.inspect_err(|e| {
            error!("Error connecting to MySQL database: {e}");
        })?;

        debug!("Executing: {sql}");
        let result = session.fetch_all(sql).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close session cleanly: {e}");
        }

        result
    }
}
