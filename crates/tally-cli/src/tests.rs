//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tally_core::{Aggregator, DisplayLocale, TransactionKind};
use tempfile::TempDir;

use crate::cli::InputArgs;
use crate::commands::{self, reports, truncate};

const RECORDS_CSV: &str = "date,type,amount,category,icon,description
2026-01-02,income,3000,Salary,💼,ACME payroll
2026-01-05,expense,-950,Rent,🏠,
2026-01-18,expense,-120.40,Groceries,🛒,Corner market
2026-02-02,income,3000,Salary,💼,ACME payroll
2026-02-05,expense,-950,Rent,🏠,
2026-02-11,expense,-38.90,Dining,🍕,Pizza night
2026-02-27,expense,-2000,Total,,Summary row
bad-date,expense,-10,Groceries,,
2026-02-28,bonus,100,Salary,,
";

/// Write the sample records into a temp dir, returning (dir, csv path)
fn setup_records() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(RECORDS_CSV.as_bytes()).unwrap();
    (dir, path)
}

/// Config path that does not exist, so embedded defaults are used
fn no_config(dir: &TempDir) -> PathBuf {
    dir.path().join("missing.toml")
}

fn input_for(file: &Path) -> InputArgs {
    InputArgs {
        file: file.to_path_buf(),
        now: Some("2026-02-28".to_string()),
        ..Default::default()
    }
}

// ========== Shared Plumbing Tests ==========

#[test]
fn test_prepare_loads_and_pins_now() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    let prepared = commands::prepare(Some(&config), &input_for(&path)).unwrap();

    // The unknown "bonus" type is dropped by the loader, the bad date is kept
    assert_eq!(prepared.records.len(), 8);
    assert_eq!(prepared.stats.skipped, 1);
    assert_eq!(
        prepared.ctx.now.date(),
        NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
    );
    assert_eq!(prepared.ctx.locale, DisplayLocale::EnUs);
    assert_eq!(prepared.config.top_n, 6);
}

#[test]
fn test_prepare_applies_filters() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);
    let input = InputArgs {
        kind: Some("expense".to_string()),
        from: Some("2026-02-01".to_string()),
        ..input_for(&path)
    };

    let prepared = commands::prepare(Some(&config), &input).unwrap();

    assert!(prepared
        .records
        .iter()
        .all(|tx| tx.kind == TransactionKind::Expense && tx.date.starts_with("2026-02")));
    assert_eq!(prepared.records.len(), 3);
}

#[test]
fn test_prepare_uses_config_file() {
    let (dir, path) = setup_records();
    let config = dir.path().join("analytics.toml");
    std::fs::write(
        &config,
        "[defaults]\nlocale = \"fr-FR\"\n\n[breakdown]\ntop_n = 2\n",
    )
    .unwrap();

    let prepared = commands::prepare(Some(&config), &input_for(&path)).unwrap();
    assert_eq!(prepared.config.top_n, 2);
    assert_eq!(prepared.ctx.locale, DisplayLocale::FrFr);

    // --locale wins over the config file
    let input = InputArgs {
        locale: Some("de_DE".to_string()),
        ..input_for(&path)
    };
    let prepared = commands::prepare(Some(&config), &input).unwrap();
    assert_eq!(prepared.ctx.locale, DisplayLocale::DeDe);
}

#[test]
fn test_prepare_rejects_bad_flags() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    let bad_kind = InputArgs {
        kind: Some("refund".to_string()),
        ..input_for(&path)
    };
    assert!(commands::prepare(Some(&config), &bad_kind).is_err());

    let bad_now = InputArgs {
        now: Some("28/02/2026".to_string()),
        ..input_for(&path)
    };
    assert!(commands::prepare(Some(&config), &bad_now).is_err());

    let reversed = InputArgs {
        from: Some("2026-03-01".to_string()),
        to: Some("2026-01-01".to_string()),
        ..input_for(&path)
    };
    assert!(commands::prepare(Some(&config), &reversed).is_err());

    let bad_locale = InputArgs {
        locale: Some("xx-YY".to_string()),
        ..input_for(&path)
    };
    assert!(commands::prepare(Some(&config), &bad_locale).is_err());
}

#[test]
fn test_prepare_missing_or_unsupported_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = no_config(&dir);

    let missing = input_for(&dir.path().join("nope.csv"));
    assert!(commands::prepare(Some(&config), &missing).is_err());

    let txt = dir.path().join("records.txt");
    std::fs::write(&txt, RECORDS_CSV).unwrap();
    assert!(commands::prepare(Some(&config), &input_for(&txt)).is_err());
}

#[test]
fn test_build_filter_open_ended_range() {
    let input = InputArgs {
        to: Some("2026-01-31".to_string()),
        ..Default::default()
    };

    let filter = commands::build_filter(&input).unwrap();
    let (from, to) = filter.date_range.unwrap();
    assert_eq!(from, NaiveDate::MIN);
    assert_eq!(to, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_evolution() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    assert!(commands::cmd_evolution(Some(&config), &input_for(&path)).is_ok());

    let json = InputArgs {
        json: true,
        ..input_for(&path)
    };
    assert!(commands::cmd_evolution(Some(&config), &json).is_ok());
}

#[test]
fn test_cmd_breakdown_with_top() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    assert!(commands::cmd_breakdown(Some(&config), &input_for(&path), Some(1)).is_ok());
    assert!(commands::cmd_breakdown(Some(&config), &input_for(&path), None).is_ok());
}

#[test]
fn test_cmd_savings_with_horizon() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    assert!(commands::cmd_savings(Some(&config), &input_for(&path), Some(6)).is_ok());
    assert!(commands::cmd_savings(Some(&config), &input_for(&path), Some(0)).is_ok());
}

#[test]
fn test_cmd_dashboard() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    assert!(commands::cmd_dashboard(Some(&config), &input_for(&path)).is_ok());

    let json = InputArgs {
        json: true,
        ..input_for(&path)
    };
    assert!(commands::cmd_dashboard(Some(&config), &json).is_ok());
}

#[test]
fn test_cmd_dashboard_json_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = no_config(&dir);
    let path = dir.path().join("records.json");
    std::fs::write(
        &path,
        r#"[{"date": "2026-02-01", "type": "expense", "amount": 12, "category": "Coffee"}]"#,
    )
    .unwrap();

    assert!(commands::cmd_dashboard(Some(&config), &input_for(&path)).is_ok());
}

#[test]
fn test_prepared_records_feed_engine() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    let prepared = commands::prepare(Some(&config), &input_for(&path)).unwrap();
    let engine = tally_core::AnalyticsEngine::from_config(&prepared.config);
    let breakdown = engine
        .breakdown()
        .aggregate(&prepared.records, &prepared.ctx);

    // Summary row excluded, bad date skipped
    assert_eq!(breakdown.items[0].category, "Rent");
    assert_eq!(breakdown.items[0].total_expense, 1900.0);
    assert_eq!(breakdown.total_expense, 2059.3);
    assert_eq!(breakdown.skipped_records, 1);
}

#[test]
fn test_breakdown_output_reports_skipped_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = no_config(&dir);
    let path = dir.path().join("records.csv");
    std::fs::write(
        &path,
        "date,type,amount,category\n03/02/2026,expense,12,Food\nyesterday,expense,30,Rent\n",
    )
    .unwrap();

    let prepared = commands::prepare(Some(&config), &input_for(&path)).unwrap();
    let engine = tally_core::AnalyticsEngine::from_config(&prepared.config);
    let dashboard = engine.run(&prepared.records, &prepared.ctx);

    let breakdown = reports::breakdown_lines(&dashboard.breakdown);
    assert!(breakdown.iter().any(|l| l.contains("No expenses found.")));
    assert!(breakdown.iter().any(|l| l.contains("2 record(s) skipped")));

    let savings = reports::savings_lines(&dashboard.savings);
    assert!(savings.iter().any(|l| l.contains("2 record(s) skipped")));
}

#[test]
fn test_evolution_output_has_one_row_per_month() {
    let (dir, path) = setup_records();
    let config = no_config(&dir);

    let prepared = commands::prepare(Some(&config), &input_for(&path)).unwrap();
    let engine = tally_core::AnalyticsEngine::from_config(&prepared.config);
    let report = engine.evolution().aggregate(&prepared.records, &prepared.ctx);

    let lines = reports::evolution_lines(&report);
    assert!(lines.iter().any(|l| l.starts_with("   Jan 2026")));
    assert!(lines.iter().any(|l| l.starts_with("   Feb 2026")));
    assert!(lines.iter().any(|l| l.contains("1 record(s) skipped")));
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 25), "Groceries");
    assert_eq!(truncate("A very long category name here", 10), "A very ...");
    assert_eq!(truncate("🛒 Groceries and household", 8), "🛒 Gro...");
}
