//! Savings Projection - cumulative net savings with a short-horizon forecast
//!
//! Realized months carry the running sum of (income - expenses). The months
//! after the current one are projected from a least-squares line fitted over
//! the realized cumulative values, or carried forward flat when only one
//! realized month exists.

use tracing::debug;

use crate::config::{DEFAULT_GRAND_TOTAL_CATEGORY, DEFAULT_HORIZON_MONTHS};
use crate::models::{MonthlySavingPoint, ProjectionMethod, SavingsProjection, Transaction};
use crate::month::YearMonth;

use super::buckets::MonthlyBuckets;
use super::engine::{Aggregator, AnalysisContext};
use super::round2;
use super::trend::LinearTrend;

/// Aggregator producing the cumulative savings series
#[derive(Debug, Clone)]
pub struct SavingsProjectionEngine {
    /// Number of months projected past the current one (default 3)
    horizon_months: u32,
    excluded_category: String,
}

impl SavingsProjectionEngine {
    pub fn new() -> Self {
        Self::with_horizon(DEFAULT_HORIZON_MONTHS)
    }

    pub fn with_horizon(horizon_months: u32) -> Self {
        Self {
            horizon_months,
            excluded_category: DEFAULT_GRAND_TOTAL_CATEGORY.to_string(),
        }
    }

    /// Override the grand-total category label that is left out
    pub fn with_excluded_category(mut self, label: impl Into<String>) -> Self {
        self.excluded_category = label.into();
        self
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    fn empty(&self, skipped: usize) -> SavingsProjection {
        SavingsProjection {
            horizon_months: self.horizon_months,
            method: ProjectionMethod::Unavailable,
            trend: None,
            points: Vec::new(),
            skipped_records: skipped,
        }
    }
}

impl Default for SavingsProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn saving_point(month: YearMonth, index: usize, ctx: &AnalysisContext) -> MonthlySavingPoint {
    MonthlySavingPoint {
        month_key: month,
        label: month.label(ctx.locale),
        date: month.first_day(),
        index,
        real_value: None,
        projected_value: None,
    }
}

impl Aggregator for SavingsProjectionEngine {
    type Output = SavingsProjection;

    fn name(&self) -> &'static str {
        "savings_projection"
    }

    fn aggregate(&self, records: &[Transaction], ctx: &AnalysisContext) -> SavingsProjection {
        let buckets = MonthlyBuckets::collect(records, &self.excluded_category);
        let current = ctx.current_month();

        let (Some(first), Some(last)) = (buckets.first_month(), buckets.last_month()) else {
            debug!(aggregator = self.name(), "No usable records, nothing to project");
            return self.empty(buckets.skipped);
        };
        if first > current {
            debug!(
                aggregator = self.name(),
                first = %first,
                "All records are after the current month, nothing realized"
            );
            return self.empty(buckets.skipped);
        }

        // Projection starts from "now" even when the data is stale
        let end = last.max(current);

        let mut points = Vec::new();
        let mut realized: Vec<(f64, f64)> = Vec::new();
        let mut running = 0.0;
        for (index, month) in first.iter_to(end).enumerate() {
            running += buckets.totals(month).net();
            let mut point = saving_point(month, index, ctx);
            if month <= current {
                point.real_value = Some(round2(running));
                realized.push((index as f64, running));
            }
            points.push(point);
        }

        // Real months form a prefix, so the current month sits right after it
        let current_index = realized.len() - 1;

        let (method, trend) = match realized.as_slice() {
            [] => (ProjectionMethod::Unavailable, None),
            [(_, value)] => (ProjectionMethod::Flat, Some(LinearTrend::flat(*value))),
            pairs => (ProjectionMethod::Regression, LinearTrend::fit(pairs)),
        };

        let horizon = self.horizon_months as usize;
        if let Some(trend) = trend {
            for step in 1..=horizon {
                let index = current_index + step;
                let value = round2(trend.at(index as f64));
                match points.get_mut(index) {
                    Some(point) => {
                        if point.real_value.is_none() {
                            point.projected_value = Some(value);
                        }
                    }
                    None => {
                        let month = current.plus_months(step as i64);
                        let mut point = saving_point(month, index, ctx);
                        point.projected_value = Some(value);
                        points.push(point);
                    }
                }
            }

            // Anchor the projected line on the last realized value
            if horizon > 0 {
                let anchor = &mut points[current_index];
                anchor.projected_value = anchor.real_value;
            }
        }

        points.truncate(current_index + horizon + 1);

        debug!(
            aggregator = self.name(),
            realized = realized.len(),
            points = points.len(),
            method = method.as_str(),
            skipped = buckets.skipped,
            "Savings projection built"
        );

        SavingsProjection {
            horizon_months: self.horizon_months,
            method,
            trend,
            points,
            skipped_records: buckets.skipped,
        }
    }
}
