//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Monthly analytics and savings forecasts for your budget
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Budget analytics: monthly evolution, top categories, savings projection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Monthly income and expense totals up to the current month
    Evolution {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Top expense categories
    Breakdown {
        /// Number of categories to list (overrides config)
        #[arg(long)]
        top: Option<usize>,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Cumulative savings with a short projection
    Savings {
        /// Months to project past the current one (overrides config)
        #[arg(long)]
        horizon: Option<u32>,

        #[command(flatten)]
        input: InputArgs,
    },

    /// All three series from the same input
    Dashboard {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Input, reference date and filter options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Transactions file (.csv or .json)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Reference date (YYYY-MM-DD) treated as "today"
    #[arg(long)]
    pub now: Option<String>,

    /// Month label locale: en-US, en-GB, es-ES, pt-BR, fr-FR, de-DE, it-IT
    #[arg(long)]
    pub locale: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Only records whose category or description contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Only records in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only records of this type: income, expense, savings
    #[arg(long)]
    pub kind: Option<String>,

    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
}
