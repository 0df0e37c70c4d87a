//! Shared command plumbing
//!
//! Every analytics command goes through `prepare`: load the config, read the
//! transactions file, apply the filter flags and pin the reference date.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{
    import, AnalysisContext, AnalyticsConfig, DisplayLocale, ImportStats, Transaction,
    TransactionFilter, TransactionKind,
};

use crate::cli::InputArgs;

/// Everything a command needs to run the aggregators
#[derive(Debug)]
pub struct Prepared {
    pub config: AnalyticsConfig,
    pub ctx: AnalysisContext,
    pub records: Vec<Transaction>,
    pub stats: ImportStats,
}

/// Load config (explicit path, data dir override, or embedded defaults)
pub fn load_config(config_path: Option<&Path>) -> Result<AnalyticsConfig> {
    match config_path {
        Some(path) => AnalyticsConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => AnalyticsConfig::load().context("Failed to load analytics config"),
    }
}

/// Parse a YYYY-MM-DD flag value
pub fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

/// Build the filter described by the command-line flags
pub fn build_filter(input: &InputArgs) -> Result<TransactionFilter<'_>> {
    let kind = input
        .kind
        .as_deref()
        .map(str::parse::<TransactionKind>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let from = parse_date_arg(input.from.as_deref(), "--from")?;
    let to = parse_date_arg(input.to.as_deref(), "--to")?;
    let date_range = match (from, to) {
        (None, None) => None,
        (from, to) => {
            let from = from.unwrap_or(NaiveDate::MIN);
            let to = to.unwrap_or(NaiveDate::MAX);
            if from > to {
                anyhow::bail!("--from {} is after --to {}", from, to);
            }
            Some((from, to))
        }
    };

    Ok(TransactionFilter::new()
        .search(input.search.as_deref())
        .category(input.category.as_deref())
        .kind(kind)
        .date_range(date_range))
}

/// Reference instant: `--now` at midnight, else the local clock
pub fn analysis_context(input: &InputArgs, config: &AnalyticsConfig) -> Result<AnalysisContext> {
    let locale = match input.locale.as_deref() {
        Some(tag) => tag.parse::<DisplayLocale>().map_err(anyhow::Error::msg)?,
        None => config.locale,
    };

    Ok(match parse_date_arg(input.now.as_deref(), "--now")? {
        Some(date) => AnalysisContext::on(date, locale),
        None => AnalysisContext::current(locale),
    })
}

pub fn prepare(config_path: Option<&Path>, input: &InputArgs) -> Result<Prepared> {
    let config = load_config(config_path)?;
    let ctx = analysis_context(input, &config)?;
    let filter = build_filter(input)?;

    let loaded = import::load_path(&input.file)
        .with_context(|| format!("Failed to load transactions from {}", input.file.display()))?;

    if loaded.stats.skipped > 0 {
        tracing::info!(
            skipped = loaded.stats.skipped,
            "Some rows were not loaded (unknown type or amount)"
        );
    }

    let records = if filter.is_empty() {
        loaded.transactions
    } else {
        filter.apply(&loaded.transactions)
    };

    Ok(Prepared {
        config,
        ctx,
        records,
        stats: loaded.stats,
    })
}
