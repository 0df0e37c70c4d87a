//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::{
    Aggregator, AnalyticsEngine, CategoryBreakdownAggregator, CategoryBreakdownReport,
    EvolutionReport, SavingsProjection, SavingsProjectionEngine,
};

use super::core::prepare;
use super::truncate;
use crate::cli::InputArgs;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;
    println!("{}", json);
    Ok(())
}

pub fn cmd_evolution(config_path: Option<&Path>, input: &InputArgs) -> Result<()> {
    let prepared = prepare(config_path, input)?;
    let engine = AnalyticsEngine::from_config(&prepared.config);
    let report = engine.evolution().aggregate(&prepared.records, &prepared.ctx);

    if input.json {
        return print_json(&report);
    }
    print_evolution(&report);
    Ok(())
}

pub fn cmd_breakdown(
    config_path: Option<&Path>,
    input: &InputArgs,
    top: Option<usize>,
) -> Result<()> {
    let prepared = prepare(config_path, input)?;
    let aggregator = CategoryBreakdownAggregator::with_top_n(top.unwrap_or(prepared.config.top_n))
        .with_excluded_category(prepared.config.grand_total_category.as_str());
    let report = aggregator.aggregate(&prepared.records, &prepared.ctx);

    if input.json {
        return print_json(&report);
    }
    print_breakdown(&report);
    Ok(())
}

pub fn cmd_savings(
    config_path: Option<&Path>,
    input: &InputArgs,
    horizon: Option<u32>,
) -> Result<()> {
    let prepared = prepare(config_path, input)?;
    let engine =
        SavingsProjectionEngine::with_horizon(horizon.unwrap_or(prepared.config.horizon_months))
            .with_excluded_category(prepared.config.grand_total_category.as_str());
    let projection = engine.aggregate(&prepared.records, &prepared.ctx);

    if input.json {
        return print_json(&projection);
    }
    print_savings(&projection);
    Ok(())
}

pub fn cmd_dashboard(config_path: Option<&Path>, input: &InputArgs) -> Result<()> {
    let prepared = prepare(config_path, input)?;
    let dashboard = AnalyticsEngine::from_config(&prepared.config).run(&prepared.records, &prepared.ctx);

    if input.json {
        return print_json(&dashboard);
    }

    println!();
    println!("🧾 Tally Dashboard");
    println!(
        "   As of {} ({} records used, {} rows not loaded)",
        prepared.ctx.now.date(),
        prepared.records.len(),
        prepared.stats.skipped
    );
    print_evolution(&dashboard.evolution);
    print_breakdown(&dashboard.breakdown);
    print_savings(&dashboard.savings);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_evolution(report: &EvolutionReport) {
    print_lines(evolution_lines(report));
}

fn print_breakdown(report: &CategoryBreakdownReport) {
    print_lines(breakdown_lines(report));
}

fn print_savings(projection: &SavingsProjection) {
    print_lines(savings_lines(projection));
}

fn skipped_line(skipped: usize) -> Option<String> {
    (skipped > 0).then(|| format!("   \x1b[2m{} record(s) skipped (unreadable date)\x1b[0m", skipped))
}

pub(crate) fn evolution_lines(report: &EvolutionReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "📈 Monthly Evolution".to_string(),
        "   ─────────────────────────────────────────────────────────".to_string(),
        format!(
            "   {:12} │ {:>12} │ {:>12} │ {:>12}",
            "Month", "Income", "Expenses", "Net"
        ),
        "   ─────────────┼──────────────┼──────────────┼─────────────".to_string(),
    ];

    for point in &report.points {
        lines.push(format!(
            "   {:12} │ {:>12.2} │ {:>12.2} │ {:>12.2}",
            truncate(&point.label, 12),
            point.income_total,
            point.expense_total,
            point.income_total - point.expense_total
        ));
    }

    lines.extend(skipped_line(report.skipped_records));
    lines
}

pub(crate) fn breakdown_lines(report: &CategoryBreakdownReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "📊 Top Categories".to_string(),
        "   ─────────────────────────────────────────────────────────".to_string(),
    ];

    if report.items.is_empty() {
        lines.push("   No expenses found.".to_string());
        // Unreadable dates are often why nothing is listed
        lines.extend(skipped_line(report.skipped_records));
        return lines;
    }

    lines.push(format!("   Total expenses: {:.2}", report.total_expense));
    lines.push(String::new());
    lines.push(format!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    ));
    lines.push("   ──────────────────────────┼────────────┼────────┼───────".to_string());

    for item in &report.items {
        let label = match &item.icon {
            Some(icon) => format!("{} {}", icon, item.category),
            None => item.category.clone(),
        };
        lines.push(format!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&label, 25),
            item.total_expense,
            item.percentage,
            item.transaction_count
        ));
    }

    lines.extend(skipped_line(report.skipped_records));
    lines
}

pub(crate) fn savings_lines(projection: &SavingsProjection) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("💰 Savings Projection ({})", projection.method),
        "   ─────────────────────────────────────────────────────────".to_string(),
    ];

    if projection.points.is_empty() {
        lines.push("   Not enough data to project savings.".to_string());
        lines.extend(skipped_line(projection.skipped_records));
        return lines;
    }

    lines.push(format!(
        "   {:12} │ {:>12} │ {:>12}",
        "Month", "Saved", "Projected"
    ));
    lines.push("   ─────────────┼──────────────┼─────────────".to_string());

    let fmt = |value: Option<f64>| value.map(|v| format!("{:.2}", v)).unwrap_or_default();
    for point in &projection.points {
        lines.push(format!(
            "   {:12} │ {:>12} │ {:>12}",
            truncate(&point.label, 12),
            fmt(point.real_value),
            fmt(point.projected_value)
        ));
    }

    if let Some(change) = projection.projected_change() {
        lines.push(String::new());
        lines.push(format!(
            "   Expected change over {} month(s): {:+.2}",
            projection.horizon_months, change
        ));
    }

    lines.extend(skipped_line(projection.skipped_records));
    lines
}
