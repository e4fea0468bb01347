//! MySQL MCP gateway - exposes a MySQL database to AI agents as MCP tools.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod gateway;
pub mod logging;
pub mod schemas;
pub mod server;
