//! Tally CLI - Budget analytics from a transactions file
//!
//! Usage:
//!   tally evolution --file records.csv            Monthly income/expense totals
//!   tally breakdown --file records.csv --top 5    Top expense categories
//!   tally savings --file records.csv --horizon 6  Savings with projection
//!   tally dashboard --file records.json --json    Everything, as JSON

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
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

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Evolution { input } => commands::cmd_evolution(config, &input),
        Commands::Breakdown { top, input } => commands::cmd_breakdown(config, &input, top),
        Commands::Savings { horizon, input } => commands::cmd_savings(config, &input, horizon),
        Commands::Dashboard { input } => commands::cmd_dashboard(config, &input),
    }
}
