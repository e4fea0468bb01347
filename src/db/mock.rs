//! Mock database connector for testing.
//!
//! Serves scripted results per SQL statement and keeps a probe on every
//! session it opens, so tests can check that sessions were closed.

use super::{ColumnInfo, Connector, ResultSet, Row, Session, Value, NO_RESULT_SET};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Observes the connected state of a session after it has been handed out.
#[derive(Debug, Clone)]
pub struct SessionProbe {
    connected: Arc<AtomicBool>,
}

impl SessionProbe {
    /// Returns true while the observed session is still open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// A connector that returns predefined results instead of talking to MySQL.
#[derive(Debug, Default)]
pub struct MockConnector {
    responses: HashMap<String, std::result::Result<ResultSet, String>>,
    refuse_connections: Option<String>,
    probes: Mutex<Vec<SessionProbe>>,
}

impl MockConnector {
    /// Creates a mock connector with no scripted statements.
    ///
    /// Unscripted statements succeed with an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connector whose every connection attempt fails.
    pub fn refusing(message: impl Into<String>) -> Self {
        Self {
            refuse_connections: Some(message.into()),
            ..Self::default()
        }
    }

    /// Scripts the result of a statement.
    pub fn with_result(mut self, sql: impl Into<String>, result: ResultSet) -> Self {
        self.responses.insert(sql.into(), Ok(result));
        self
    }

    /// Scripts a single-column result, one row per value.
    pub fn with_column(self, sql: impl Into<String>, column: &str, values: &[&str]) -> Self {
        let rows: Vec<Row> = values.iter().map(|v| vec![Value::from(*v)]).collect();
        let columns = if rows.is_empty() {
            Vec::new()
        } else {
            vec![ColumnInfo::new(column, "VARCHAR")]
        };
        self.with_result(sql, ResultSet::with_data(columns, rows))
    }

    /// Scripts a statement that the server rejects.
    pub fn with_query_error(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(sql.into(), Err(message.into()));
        self
    }

    /// Scripts a statement that completes without a result set (INSERT, DDL).
    pub fn with_statement(self, sql: impl Into<String>) -> Self {
        self.with_query_error(sql, NO_RESULT_SET)
    }

    /// Returns probes for every session opened so far, in order.
    pub fn sessions(&self) -> Vec<SessionProbe> {
        self.probes
            .lock()
            .map(|probes| probes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn Session>> {
        if let Some(message) = &self.refuse_connections {
            return Err(GatewayError::connection(message.clone()));
        }

        let connected = Arc::new(AtomicBool::new(true));
        if let Ok(mut probes) = self.probes.lock() {
            probes.push(SessionProbe {
                connected: Arc::clone(&connected),
            });
        }

        Ok(Box::new(MockSession {
            responses: self.responses.clone(),
            connected,
        }))
    }
}

/// A session created by [`MockConnector`].
#[derive(Debug)]
pub struct MockSession {
    responses: HashMap<String, std::result::Result<ResultSet, String>>,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl Session for MockSession {
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet> {
        if !self.is_connected() {
            return Err(GatewayError::connection("Session is already closed"));
        }

        match self.responses.get(sql) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(GatewayError::query(message.clone())),
            None => Ok(ResultSet::new()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
