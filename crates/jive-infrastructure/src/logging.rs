//! Logging initialisation.
//!
//! Logs go to stderr so stdout stays clean for the stdio MCP transport.
//! `RUST_LOG` overrides the default `info` filter.

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
