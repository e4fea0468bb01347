//! MCP tool parameter schemas
//!
//! Defines the input parameter structures for all MCP tools.
//! All structs derive `Debug`, `Deserialize`, and `JsonSchema` as required by rmcp.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for `list_databases` tool.
///
/// This tool takes no parameters, but we need an empty struct for the schema.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDatabasesParams {}

/// Parameters for `list_tables` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTablesParams {}

/// Parameters for `execute_query` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteQueryParams {
    /// The SQL statement to execute.
    #[schemars(description = "The SQL statement to execute, sent to the server verbatim")]
    pub query: String,
}

/// Parameters for `get_table_schema` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTableSchemaParams {
    /// Name of the table to describe.
    #[schemars(description = "Name of the table in the configured database to describe")]
    pub table_name: String,
}
