//! Database access layer.
//!
//! Provides a trait-based interface for opening sessions and running
//! statements, so the gateway can be driven by MySQL or by an in-memory mock.

mod mock;
mod mysql;
mod types;

pub use mock::{MockConnector, MockSession, SessionProbe};
pub use mysql::{MySqlConnector, MySqlSession};
pub use types::{ColumnInfo, ResultSet, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Reported when a statement completes without producing a result set.
pub const NO_RESULT_SET: &str = "No result set to fetch from.";

/// Opens database sessions.
///
/// Each call returns a fresh session; implementations never hand out the
/// same connection twice.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes a new session, failing with a connection error when the
    /// server is unreachable or rejects the credentials.
    async fn connect(&self) -> Result<Box<dyn Session>>;
}

/// A live database session owned by a single operation.
#[async_trait]
pub trait Session: Send {
    /// Executes one SQL statement verbatim and returns all of its rows.
    ///
    /// Input holding more than one statement, and statements without a result
    /// set, fail with a query error. Nothing the statement changes is committed.
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet>;

    /// Closes the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Returns true while the session holds an open connection.
    fn is_connected(&self) -> bool;
}
