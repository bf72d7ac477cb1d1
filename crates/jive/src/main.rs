//! Jive entry point.
//!
//! `jive serve` speaks MCP over stdio (the default for agent clients);
//! `jive serve-http` exposes the HTTP companion API for the web UI. Both
//! share one service context built from layered configuration
//! (`jive.toml` + `JIVE_*` environment variables).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jive_infrastructure::{AppConfig, ServiceContext, logging};
use jive_server::{Dispatcher, serve_http, serve_stdio};

#[derive(Debug, Parser)]
#[command(name = "jive", version, about = "Agent-driven work tracking over MCP")]
struct Cli {
    /// Path to a TOML configuration file (default: ./jive.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true, env = "JIVE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Serve the HTTP companion API
    ServeHttp {
        /// Port to bind; defaults to the configured mcp_port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let ctx = ServiceContext::initialize(config).await?;
            serve_stdio(ctx).await?;
        }
        Command::ServeHttp { port } => {
            let port = port.unwrap_or(config.mcp_port);
            let ctx = ServiceContext::initialize(config).await?;
            serve_http(Dispatcher::new(ctx), port).await?;
        }
        Command::Config => {
            tracing::info!(config = ?config, "resolved configuration");
        }
    }
    Ok(())
}
