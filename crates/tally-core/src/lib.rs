//! Tally Core Library
//!
//! Chart-ready analytics for the Tally budgeting tool:
//! - Monthly income/expense evolution with gap filling
//! - Top-N expense category breakdown
//! - Cumulative savings with a least-squares projection
//! - Transaction filters shared by the analytics screens
//! - CSV/JSON record loading
//! - Layered TOML configuration

pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod import;
pub mod models;
pub mod month;

pub use analytics::{
    Aggregator, AnalysisContext, AnalyticsEngine, CategoryBreakdownAggregator, Dashboard,
    LinearTrend, MonthlyEvolutionAggregator, SavingsProjectionEngine,
};
pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use filter::TransactionFilter;
pub use import::{ImportStats, InputFormat, LoadedRecords};
pub use models::{
    CategoryBreakdownItem, CategoryBreakdownReport, DisplayLocale, EvolutionPoint,
    EvolutionReport, MonthlySavingPoint, ProjectionMethod, SavingsProjection, Transaction,
    TransactionKind,
};
pub use month::YearMonth;
