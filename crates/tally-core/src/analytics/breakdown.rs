//! Category Breakdown - top-N expense categories

use std::collections::HashMap;

use tracing::debug;

use crate::config::{DEFAULT_GRAND_TOTAL_CATEGORY, DEFAULT_TOP_N};
use crate::models::{CategoryBreakdownItem, CategoryBreakdownReport, Transaction, TransactionKind};

use super::engine::{Aggregator, AnalysisContext};
use super::round2;

/// Aggregator summing expenses per category label
#[derive(Debug, Clone)]
pub struct CategoryBreakdownAggregator {
    /// Maximum number of categories returned (default 6)
    top_n: usize,
    excluded_category: String,
}

/// Running total for one category, in first-seen order
struct CategoryTotal {
    category: String,
    icon: Option<String>,
    total: f64,
    count: usize,
}

impl CategoryBreakdownAggregator {
    pub fn new() -> Self {
        Self::with_top_n(DEFAULT_TOP_N)
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            top_n,
            excluded_category: DEFAULT_GRAND_TOTAL_CATEGORY.to_string(),
        }
    }

    /// Override the grand-total category label that is left out
    pub fn with_excluded_category(mut self, label: impl Into<String>) -> Self {
        self.excluded_category = label.into();
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

impl Default for CategoryBreakdownAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for CategoryBreakdownAggregator {
    type Output = CategoryBreakdownReport;

    fn name(&self) -> &'static str {
        "category_breakdown"
    }

    fn aggregate(&self, records: &[Transaction], _ctx: &AnalysisContext) -> CategoryBreakdownReport {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut skipped = 0;

        for tx in records {
            if tx.kind != TransactionKind::Expense || tx.is_grand_total(&self.excluded_category) {
                continue;
            }
            if tx.parsed_date().is_none() {
                skipped += 1;
                continue;
            }

            let position = *positions.entry(tx.category.as_str()).or_insert_with(|| {
                totals.push(CategoryTotal {
                    category: tx.category.clone(),
                    icon: None,
                    total: 0.0,
                    count: 0,
                });
                totals.len() - 1
            });

            let entry = &mut totals[position];
            entry.total += tx.amount.abs();
            entry.count += 1;
            if entry.icon.is_none() {
                entry.icon = tx.icon.clone();
            }
        }

        let total_expense: f64 = totals.iter().map(|c| c.total).sum();

        // Stable sort keeps first-seen order between equal totals
        totals.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let categories = totals.len();
        let items: Vec<CategoryBreakdownItem> = totals
            .into_iter()
            .take(self.top_n)
            .map(|c| CategoryBreakdownItem {
                percentage: if total_expense > 0.0 {
                    round2(c.total / total_expense * 100.0)
                } else {
                    0.0
                },
                category: c.category,
                total_expense: round2(c.total),
                icon: c.icon,
                transaction_count: c.count,
            })
            .collect();

        debug!(
            aggregator = self.name(),
            categories,
            returned = items.len(),
            skipped,
            "Category breakdown built"
        );

        CategoryBreakdownReport {
            top_n: self.top_n,
            total_expense: round2(total_expense),
            items,
            skipped_records: skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayLocale;
    use chrono::NaiveDate;

    fn ctx() -> AnalysisContext {
        AnalysisContext::on(
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            DisplayLocale::EnUs,
        )
    }

    fn expense(category: &str, amount: f64) -> Transaction {
        Transaction::new("2026-03-01", TransactionKind::Expense, amount, category)
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let records = vec![
            expense("Food", 100.0),
            expense("Rent", 900.0),
            expense("Fun", 50.0),
            expense("Food", -150.0),
            expense("Travel", 300.0),
        ];

        let report = CategoryBreakdownAggregator::with_top_n(3).aggregate(&records, &ctx());

        let names: Vec<_> = report.items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Travel", "Food"]);
        assert_eq!(report.items[2].total_expense, 250.0);
        assert_eq!(report.items[2].transaction_count, 2);
        assert_eq!(report.total_expense, 1500.0);
        assert_eq!(report.items[0].percentage, 60.0);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![expense("B", 10.0), expense("A", 10.0), expense("C", 10.0)];

        let report = CategoryBreakdownAggregator::new().aggregate(&records, &ctx());

        let names: Vec<_> = report.items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_ignores_income_grand_total_and_bad_dates() {
        let records = vec![
            expense("Food", 20.0),
            expense("Total", 500.0),
            Transaction::new("2026-03-01", TransactionKind::Income, 1000.0, "Salary"),
            Transaction::new("2026-03-01", TransactionKind::Savings, 10.0, "Vault"),
            Transaction::new("yesterday", TransactionKind::Expense, 5.0, "Food"),
        ];

        let report = CategoryBreakdownAggregator::new().aggregate(&records, &ctx());

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].category, "Food");
        assert_eq!(report.items[0].total_expense, 20.0);
        assert_eq!(report.skipped_records, 1);
    }

    #[test]
    fn test_keeps_first_seen_icon() {
        let records = vec![
            expense("Food", 20.0),
            expense("Food", 20.0).with_icon("🍔"),
            expense("Food", 20.0).with_icon("🍕"),
        ];

        let report = CategoryBreakdownAggregator::new().aggregate(&records, &ctx());
        assert_eq!(report.items[0].icon.as_deref(), Some("🍔"));
    }

    #[test]
    fn test_top_n_zero_and_empty_input() {
        let records = vec![expense("Food", 20.0)];
        let report = CategoryBreakdownAggregator::with_top_n(0).aggregate(&records, &ctx());
        assert!(report.items.is_empty());
        assert_eq!(report.total_expense, 20.0);

        let report = CategoryBreakdownAggregator::new().aggregate(&[], &ctx());
        assert!(report.items.is_empty());
        assert_eq!(report.total_expense, 0.0);
    }

    #[test]
    fn test_default_top_n_is_six() {
        let records: Vec<_> = (0..10)
            .map(|i| expense(&format!("Cat{}", i), 10.0 * (i + 1) as f64))
            .collect();

        let report = CategoryBreakdownAggregator::new().aggregate(&records, &ctx());
        assert_eq!(report.items.len(), 6);
        assert_eq!(report.items[0].category, "Cat9");
        assert!(report
            .items
            .windows(2)
            .all(|w| w[0].total_expense >= w[1].total_expense));
    }
}
