//! Analytics Engine - monthly aggregation and savings forecasting
//!
//! Three independent, stateless aggregators turn an unordered slice of
//! [`Transaction`](crate::models::Transaction) records into chart-ready series:
//!
//! - **Monthly Evolution** - gap-free income/expense totals per month, capped
//!   at the current month
//! - **Category Breakdown** - top-N expense categories by total
//! - **Savings Projection** - cumulative net savings with a least-squares
//!   forecast for the next few months
//!
//! Every aggregator is a pure function of its input records and the
//! [`AnalysisContext`], which carries the single "now" used for one run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::analytics::{AnalysisContext, AnalyticsEngine};
//!
//! let engine = AnalyticsEngine::from_config(&config);
//! let ctx = AnalysisContext::current(config.locale);
//! let dashboard = engine.run(&transactions, &ctx);
//! ```

mod buckets;
pub mod breakdown;
pub mod engine;
pub mod evolution;
pub mod savings;
pub mod trend;

pub use breakdown::CategoryBreakdownAggregator;
pub use engine::{Aggregator, AnalysisContext, AnalyticsEngine, Dashboard};
pub use evolution::MonthlyEvolutionAggregator;
pub use savings::SavingsProjectionEngine;
pub use trend::LinearTrend;

/// Round a stored monetary value to cents
///
/// Only applied when a value is written into a report, never to running sums.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.is_finite() {
        // Avoid "-0.00" in rendered output
        rounded + 0.0
    } else {
        0.0
    }
}
