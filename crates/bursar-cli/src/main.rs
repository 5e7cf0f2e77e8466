//! Bursar CLI - student finance analysis service
//!
//! Usage:
//!   bursar serve --port 8000        Start the REST API server
//!   bursar serve --mock             Serve with the offline mock backend
//!   bursar analyze request.json     Run one analysis offline

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve { host, port, mock } => commands::cmd_serve(&host, port, mock).await,
        Commands::Analyze { file } => commands::cmd_analyze(&file).await,
    }
}
