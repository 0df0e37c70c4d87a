//! Month-keyed accumulation shared by the evolution and savings aggregators

use std::collections::BTreeMap;

use crate::models::{Transaction, TransactionKind};
use crate::month::YearMonth;

/// Raw (unrounded) totals for one month
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MonthTotals {
    pub income: f64,
    /// Sum of absolute expense amounts
    pub expense: f64,
}

impl MonthTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Income/expense totals grouped by calendar month
#[derive(Debug, Default)]
pub(crate) struct MonthlyBuckets {
    months: BTreeMap<YearMonth, MonthTotals>,
    /// Income/expense records whose date could not be parsed
    pub skipped: usize,
}

impl MonthlyBuckets {
    /// Group income and expense records by month
    ///
    /// Grand-total rows and savings-type records are ignored; records with an
    /// unparseable date are counted in `skipped`.
    pub fn collect(records: &[Transaction], grand_total_category: &str) -> Self {
        let mut buckets = Self::default();

        for tx in records {
            if tx.is_grand_total(grand_total_category) {
                continue;
            }
            // Savings-type records carry no net effect
            let Some(net) = tx.net_amount() else {
                continue;
            };
            let Some(date) = tx.parsed_date() else {
                buckets.skipped += 1;
                continue;
            };

            let totals = buckets
                .months
                .entry(YearMonth::from_date(&date))
                .or_default();
            if tx.kind == TransactionKind::Income {
                totals.income += net;
            } else {
                totals.expense -= net;
            }
        }

        buckets
    }

    pub fn first_month(&self) -> Option<YearMonth> {
        self.months.keys().next().copied()
    }

    pub fn last_month(&self) -> Option<YearMonth> {
        self.months.keys().next_back().copied()
    }

    /// Totals for a month, zero if nothing happened in it
    pub fn totals(&self, month: YearMonth) -> MonthTotals {
        self.months.get(&month).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }
}
