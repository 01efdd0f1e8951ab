mod cli;
mod commands;
mod error;
mod geometry;
mod layout;
mod mcp;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

// Per-page progress is logged at info.
const DEFAULT_LOG_FILTER: &str = "info";

fn init_tracing() {
    // stdout carries the summary, JSON output, or the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.split_request() {
        Some(request) => commands::split::run(&request, cli.json)?,
        None => mcp::run_server().await?,
    }

    Ok(())
}
