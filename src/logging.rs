//! Logging configuration.
//!
//! stdout carries MCP protocol frames, so all diagnostics go to stderr.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Initializes logging on stderr.
///
/// Honors `RUST_LOG`; ANSI colors are disabled because MCP hosts usually
/// capture stderr into plain log files.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

