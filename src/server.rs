//! MCP Server implementation.
//!
//! Exposes the query gateway's four operations as tools for AI agents.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

use crate::error::{GatewayError, Result as GatewayResult};
use crate::gateway::QueryGateway;
use crate::schemas::{ExecuteQueryParams, GetTableSchemaParams, ListDatabasesParams, ListTablesParams};

/// Maps a gateway failure to a protocol error, keeping its category and message.
///
/// A rejected statement is the caller's to fix, so it is reported as invalid
/// params; everything else is a server-side failure.
fn map_gateway_error(tool_name: &str, error: &GatewayError) -> McpError {
    let message = error.to_string();
    if error.is_query() {
        tracing::warn!("{tool_name} rejected: {message}");
        McpError::invalid_params(message, None)
    } else if error.is_connection() {
        // Logged at error level by the gateway already.
        tracing::debug!("{tool_name} failed: {message}");
        McpError::internal_error(message, None)
    } else {
        tracing::error!("{tool_name} failed: {message}");
        McpError::internal_error(message, None)
    }
}

/// Wraps a gateway outcome as a single text content item.
fn into_tool_result(tool_name: &str, outcome: GatewayResult<String>) -> Result<CallToolResult, McpError> {
    let text = outcome.map_err(|e| map_gateway_error(tool_name, &e))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP Server for a MySQL database.
#[derive(Clone)]
pub struct MySqlMcp {
    /// Gateway that runs every statement.
    gateway: Arc<QueryGateway>,
    /// Tool router generated by macro.
    tool_router: ToolRouter<Self>,
}

impl MySqlMcp {
    /// Create a new MCP server instance.
    #[must_use]
    pub fn new(gateway: QueryGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl MySqlMcp {
    /// List all databases on the server.
    #[tool(description = "List all databases on the MySQL server, one name per line")]
    async fn list_databases(
        &self,
        _params: Parameters<ListDatabasesParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result("list_databases", self.gateway.list_databases().await)
    }

    /// List tables in the configured database.
    #[tool(description = "List all tables in the configured database, one name per line")]
    async fn list_tables(
        &self,
        _params: Parameters<ListTablesParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result("list_tables", self.gateway.list_tables().await)
    }

    /// Execute an SQL statement.
    #[tool(
        description = "Execute a SQL query and return the results as tab-separated text with a header line of column names"
    )]
    async fn execute_query(
        &self,
        Parameters(params): Parameters<ExecuteQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result("execute_query", self.gateway.execute_query(&params.query).await)
    }

    /// Describe a table's columns.
    #[tool(
        description = "Get the schema of a table: name, type, nullability, key, default and extra attributes of each column"
    )]
    async fn get_table_schema(
        &self,
        Parameters(params): Parameters<GetTableSchemaParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result(
            "get_table_schema",
            self.gateway.get_table_schema(&params.table_name).await,
        )
    }
}

#[tool_handler]
impl ServerHandler for MySqlMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "MySQL MCP Server - Inspect and query a MySQL database. \
                 Use list_databases and list_tables to explore, get_table_schema to see \
                 a table's columns, and execute_query to run SQL. \
                 Statements are executed verbatim with the configured credentials."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "client_integration_tests.rs"]
mod client_integration_tests;
