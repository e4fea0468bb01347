//! MySQL database client implementation.
//!
//! Provides `MySqlConnector`, which opens one `MySqlSession` (a single
//! `sqlx` connection, no pool) per call.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, Connector, ResultSet, Row, Session, Value, NO_RESULT_SET};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use sqlx::mysql::{MySqlConnection, MySqlDatabaseError, MySqlRow};
use sqlx::{
    Column as SqlxColumn, Connection, Either, Executor, Row as SqlxRow, Statement, TypeInfo,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// MySQL error number for rejected credentials.
const ER_ACCESS_DENIED: u16 = 1045;

/// MySQL error number for an unknown default database.
const ER_BAD_DB: u16 = 1049;

const MULTIPLE_STATEMENTS: &str = "Only one statement can be executed per call.";

/// Opens MySQL sessions for a fixed configuration.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    config: ConnectionConfig,
}

impl MySqlConnector {
    /// Creates a connector for the given configuration.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self) -> Result<Box<dyn Session>> {
        let session = MySqlSession::connect(&self.config).await?;
        Ok(Box::new(session))
    }
}

/// A single MySQL connection.
///
/// Dropping the session without calling [`Session::close`] still releases the
/// socket, but skips the polite `COM_QUIT` handshake.
#[derive(Debug)]
pub struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    /// Opens a new connection. No retries are attempted.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        debug!("Connecting to {}", config.display_string());

        let options = config.to_connect_options();
        let conn = tokio::time::timeout(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            MySqlConnection::connect_with(&options),
        )
        .await
        .map_err(|_| {
            GatewayError::connection(format!(
                "Connection to {}:{} timed out after {CONNECT_TIMEOUT_SECS} seconds",
                config.host, config.port
            ))
        })?
        .map_err(|e| map_connection_error(&e, config))?;

        Ok(Self { conn: Some(conn) })
    }
}

#[async_trait]
impl Session for MySqlSession {
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| GatewayError::connection("Session is already closed"))?;

        // Nothing sent through a session is ever committed.
        let mut tx = conn.begin().await?;
        let outcome = run_statement(&mut tx, sql).await;
        if let Err(e) = tx.rollback().await {
            warn!("Failed to roll back: {e}");
        }
        let result = outcome?;

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = result.iter().map(convert_row).collect();

        Ok(ResultSet::with_data(columns, rows))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| GatewayError::connection(format!("Failed to close connection: {e}")))?;
            debug!("Connection closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}

/// Runs one statement and returns its rows.
async fn run_statement(conn: &mut MySqlConnection, sql: &str) -> Result<Vec<MySqlRow>> {
    // Text protocol, so SHOW and DESCRIBE are accepted as-is.
    let rows = single_result(sqlx::raw_sql(sql).fetch_many(&mut *conn)).await?;

    if rows.is_empty() && !has_result_set(conn, sql).await {
        return Err(GatewayError::query(NO_RESULT_SET));
    }
    Ok(rows)
}

/// Collects the rows of the first result, failing as soon as the input turns
/// out to hold a second statement.
async fn single_result<S, D, R>(mut stream: S) -> Result<Vec<R>>
where
    S: Stream<Item = sqlx::Result<Either<D, R>>> + Unpin,
{
    let mut rows = Vec::new();
    let mut finished = false;

    while let Some(item) = stream.try_next().await? {
        if finished {
            return Err(GatewayError::query(MULTIPLE_STATEMENTS));
        }
        match item {
            Either::Left(_) => finished = true,
            Either::Right(row) => rows.push(row),
        }
    }

    Ok(rows)
}

/// Tells an empty result set apart from a statement that has none.
///
/// Preparing reports the column list without executing anything. SHOW and
/// DESCRIBE cannot always be prepared; they always carry a result set.
async fn has_result_set(conn: &mut MySqlConnection, sql: &str) -> bool {
    match conn.prepare(sql).await {
        Ok(statement) => !statement.columns().is_empty(),
        Err(_) => true,
    }
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
///
/// Rows arrive over the text protocol, so every value can be read as raw
/// bytes; integers and floats are parsed to keep their numeric identity.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let decoded = match type_name {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get_unchecked::<Option<i64>, _>(index)
            .map(Value::from)
            .ok(),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get_unchecked::<Option<u64>, _>(index)
            .map(Value::from)
            .ok(),

        "FLOAT" | "DOUBLE" => row
            .try_get_unchecked::<Option<f64>, _>(index)
            .map(Value::from)
            .ok(),

        _ => None,
    };

    // Everything else (and anything that failed to parse) keeps the server's text.
    decoded.unwrap_or_else(|| {
        row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map_or(Value::Null, Value::from)
    })
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: &sqlx::Error, config: &ConnectionConfig) -> GatewayError {
    let host = &config.host;
    let port = config.port;
    let user = config.user.as_deref().unwrap_or("");
    let database = config.database.as_deref().unwrap_or("unknown");

    let number = error
        .as_database_error()
        .and_then(|db_error| db_error.try_downcast_ref::<MySqlDatabaseError>())
        .map(MySqlDatabaseError::number);

    let error_str = error.to_string().to_lowercase();

    if number == Some(ER_ACCESS_DENIED) || error_str.contains("access denied") {
        GatewayError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if number == Some(ER_BAD_DB) || error_str.contains("unknown database") {
        GatewayError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("connection refused") {
        GatewayError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("lookup") || error_str.contains("resolve") {
        GatewayError::connection(format!("Cannot resolve host '{host}'."))
    } else if error_str.contains("ssl") || error_str.contains("tls") {
        GatewayError::connection(format!("TLS negotiation with {host}:{port} failed: {error}"))
    } else {
        GatewayError::connection(format!("Cannot connect to {host}:{port}: {error}"))
    }
}
