//! Tally CLI - Financial document extraction and tax analysis
//!
//! Usage:
//!   tally extract --file statement.pdf            Extract normalized records
//!   tally estimate --file statement.pdf           Quick flat-rate tax estimate
//!   tally optimize --file statement.pdf           Full bracket optimization
//!   tally insights --snapshot data.json           Budget/investment insights
//!   tally backend                                 Test the generation backend

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
        Commands::Extract { file, mime, raw } => {
            commands::cmd_extract(&file, mime.as_deref(), raw).await
        }
        Commands::Estimate {
            file,
            mime,
            scope,
            credits,
        } => commands::cmd_estimate(&file, mime.as_deref(), scope, credits).await,
        Commands::Optimize {
            file,
            mime,
            snapshot,
        } => commands::cmd_optimize(&file, mime.as_deref(), snapshot.as_deref()).await,
        Commands::Insights { snapshot, kind } => commands::cmd_insights(&snapshot, &kind),
        Commands::Backend => commands::cmd_backend().await,
    }
}
