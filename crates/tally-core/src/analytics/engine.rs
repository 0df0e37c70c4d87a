//! Analytics Engine - runs the aggregators against one reference instant

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::models::{
    CategoryBreakdownReport, DisplayLocale, EvolutionReport, SavingsProjection, Transaction,
};
use crate::month::YearMonth;

use super::{CategoryBreakdownAggregator, MonthlyEvolutionAggregator, SavingsProjectionEngine};

/// Context provided to aggregators
///
/// `now` is read once and shared by every aggregator in a run so they all
/// agree on where realized data ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisContext {
    /// Reference instant separating realized from projected months
    pub now: NaiveDateTime,
    /// Locale for month labels (no effect on the numbers)
    pub locale: DisplayLocale,
}

impl AnalysisContext {
    /// Context pinned to an explicit instant
    pub fn at(now: NaiveDateTime, locale: DisplayLocale) -> Self {
        Self { now, locale }
    }

    /// Context pinned to midnight of a calendar day
    pub fn on(date: NaiveDate, locale: DisplayLocale) -> Self {
        Self::at(date.and_time(chrono::NaiveTime::MIN), locale)
    }

    /// Context for the local wall clock
    pub fn current(locale: DisplayLocale) -> Self {
        Self::at(chrono::Local::now().naive_local(), locale)
    }

    /// The month containing `now`
    pub fn current_month(&self) -> YearMonth {
        YearMonth::from_date(&self.now)
    }
}

/// A stateless transformation from records to a chart series
pub trait Aggregator {
    type Output;

    /// Stable identifier used in logs
    fn name(&self) -> &'static str;

    /// Aggregate `records` as seen from `ctx.now`
    fn aggregate(&self, records: &[Transaction], ctx: &AnalysisContext) -> Self::Output;
}

/// Every series an analytics screen needs, built from the same input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub evolution: EvolutionReport,
    pub breakdown: CategoryBreakdownReport,
    pub savings: SavingsProjection,
}

/// Bundles the three aggregators with a shared configuration
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    evolution: MonthlyEvolutionAggregator,
    breakdown: CategoryBreakdownAggregator,
    savings: SavingsProjectionEngine,
}

impl AnalyticsEngine {
    /// Engine with built-in defaults (top 6 categories, 3-month horizon)
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine configured from an [`AnalyticsConfig`]
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let excluded = config.grand_total_category.as_str();
        Self {
            evolution: MonthlyEvolutionAggregator::new().with_excluded_category(excluded),
            breakdown: CategoryBreakdownAggregator::with_top_n(config.top_n)
                .with_excluded_category(excluded),
            savings: SavingsProjectionEngine::with_horizon(config.horizon_months)
                .with_excluded_category(excluded),
        }
    }

    pub fn evolution(&self) -> &MonthlyEvolutionAggregator {
        &self.evolution
    }

    pub fn breakdown(&self) -> &CategoryBreakdownAggregator {
        &self.breakdown
    }

    pub fn savings(&self) -> &SavingsProjectionEngine {
        &self.savings
    }

    /// Run every aggregator against the same records and instant
    pub fn run(&self, records: &[Transaction], ctx: &AnalysisContext) -> Dashboard {
        let dashboard = Dashboard {
            evolution: self.evolution.aggregate(records, ctx),
            breakdown: self.breakdown.aggregate(records, ctx),
            savings: self.savings.aggregate(records, ctx),
        };

        tracing::debug!(
            records = records.len(),
            now = %ctx.now,
            evolution_points = dashboard.evolution.points.len(),
            categories = dashboard.breakdown.items.len(),
            savings_points = dashboard.savings.points.len(),
            "Analytics run complete"
        );

        dashboard
    }

    /// Names of the bundled aggregators
    pub fn aggregator_names(&self) -> Vec<&'static str> {
        vec![
            self.evolution.name(),
            self.breakdown.name(),
            self.savings.name(),
        ]
    }
}
