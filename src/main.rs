//! MySQL MCP gateway - serves MySQL tools to an MCP host over stdio.

use std::process::ExitCode;

use mysql_mcp_gateway::cli::Cli;
use mysql_mcp_gateway::error::{GatewayError, Result};
use mysql_mcp_gateway::gateway::QueryGateway;
use mysql_mcp_gateway::logging;
use mysql_mcp_gateway::server::MySqlMcp;
use rmcp::ServiceExt;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up SQL_* variables from a local .env before clap reads the environment
    let dotenv = dotenvy::dotenv();

    logging::init_stderr_logging();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = cli.to_connection_config()?;
    info!("Database: {}", config.display_string());

    let server = MySqlMcp::new(QueryGateway::new(config));

    info!("Starting MCP server on stdio transport");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| GatewayError::internal(format!("Failed to start MCP server: {e}")))?;

    service
        .waiting()
        .await
        .map_err(|e| GatewayError::internal(format!("MCP server error: {e}")))?;

    info!("MCP client disconnected, shutting down");
    Ok(())
}
