//! Monthly Evolution - gap-free income/expense totals per month

use tracing::debug;

use crate::config::DEFAULT_GRAND_TOTAL_CATEGORY;
use crate::models::{EvolutionPoint, EvolutionReport, Transaction};

use super::buckets::MonthlyBuckets;
use super::engine::{Aggregator, AnalysisContext};
use super::round2;

/// Months shown when there is nothing to aggregate
pub const FALLBACK_WINDOW_MONTHS: i64 = 6;

/// Aggregator producing one point per calendar month
///
/// The series runs from the earliest month with activity to the latest one,
/// never past the current month, with zero totals for quiet months.
#[derive(Debug, Clone)]
pub struct MonthlyEvolutionAggregator {
    excluded_category: String,
}

impl MonthlyEvolutionAggregator {
    pub fn new() -> Self {
        Self {
            excluded_category: DEFAULT_GRAND_TOTAL_CATEGORY.to_string(),
        }
    }

    /// Override the grand-total category label that is left out
    pub fn with_excluded_category(mut self, label: impl Into<String>) -> Self {
        self.excluded_category = label.into();
        self
    }

    pub fn excluded_category(&self) -> &str {
        &self.excluded_category
    }
}

impl Default for MonthlyEvolutionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for MonthlyEvolutionAggregator {
    type Output = EvolutionReport;

    fn name(&self) -> &'static str {
        "monthly_evolution"
    }

    fn aggregate(&self, records: &[Transaction], ctx: &AnalysisContext) -> EvolutionReport {
        let buckets = MonthlyBuckets::collect(records, &self.excluded_category);
        let current = ctx.current_month();

        // Future-dated months are not shown; if that leaves nothing, use the fallback window
        let (start, end) = match (buckets.first_month(), buckets.last_month()) {
            (Some(first), Some(last)) if first <= current => (first, last.min(current)),
            _ => (current.plus_months(1 - FALLBACK_WINDOW_MONTHS), current),
        };

        let points: Vec<EvolutionPoint> = start
            .iter_to(end)
            .enumerate()
            .map(|(index, month)| {
                let totals = buckets.totals(month);
                EvolutionPoint {
                    month_key: month,
                    date: month.first_day(),
                    label: month.label(ctx.locale),
                    income_total: round2(totals.income),
                    expense_total: round2(totals.expense),
                    index,
                }
            })
            .collect();

        debug!(
            aggregator = self.name(),
            months_with_data = buckets.len(),
            points = points.len(),
            skipped = buckets.skipped,
            "Monthly evolution built"
        );

        EvolutionReport {
            points,
            skipped_records: buckets.skipped,
        }
    }
}
