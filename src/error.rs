//! Error types for the MySQL gateway.
//!
//! Defines the main error enum used throughout the application.

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Database connection errors (host unreachable, auth failed, unknown database, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, missing tables, permission denied, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid connection URL, bad port, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (protocol transport failures, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true when the database could not be reached or refused the session.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true when the server rejected a statement.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Statement failures, formatted the way the mysql client prints them.
///
/// Connect failures need the target address for a useful message and are
/// mapped separately by the MySQL session.
impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        let Some(db_error) = error.as_database_error() else {
            return Self::Query(error.to_string());
        };

        let message = match db_error.try_downcast_ref::<MySqlDatabaseError>() {
            Some(mysql_error) => format!(
                "ERROR {} ({}): {}",
                mysql_error.number(),
                mysql_error.code().unwrap_or("HY000"),
                mysql_error.message()
            ),
            None => db_error.message().to_string(),
        };
        Self::Query(message)
    }
}

/// Result type alias using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;
