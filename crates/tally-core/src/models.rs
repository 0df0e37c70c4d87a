//! Domain models for Tally

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::month::YearMonth;

/// Kind of money movement a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Transfers into savings and other flows that are neither income nor spending
    #[serde(alias = "saving", alias = "other", alias = "transfer")]
    Savings,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            "savings" | "saving" | "other" | "transfer" => Ok(Self::Savings),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: income, expense, savings)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated financial record as handed over by the caller
///
/// The date is kept as text: records with a date that cannot be parsed are
/// skipped by the aggregators instead of being rejected up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    /// Decorative tag shown next to the category (emoji, icon name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind,
            amount,
            category: category.into(),
            icon: None,
            description: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parsed date-time, or `None` if the date text is not recognized
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_record_date(&self.date)
    }

    /// Whether this record is the pre-aggregated "grand total" row
    pub fn is_grand_total(&self, grand_total_category: &str) -> bool {
        !grand_total_category.trim().is_empty()
            && labels_match(&self.category, grand_total_category)
    }

    /// Signed effect on net savings: income as given, expenses always negative.
    /// `None` for kinds that do not take part in income/expense aggregation.
    pub fn net_amount(&self) -> Option<f64> {
        match self.kind {
            TransactionKind::Income => Some(self.amount),
            TransactionKind::Expense => Some(-self.amount.abs()),
            TransactionKind::Savings => None,
        }
    }
}

/// Case-insensitive label comparison, ignoring surrounding whitespace
///
/// Uses full Unicode lowercasing so labels such as "Alimentação" match
/// regardless of case.
pub fn labels_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Parse a record date in any of the accepted shapes
///
/// RFC 3339 values keep their wall-clock time (the offset is dropped).
pub fn parse_record_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // 2026-03-14T09:30:00.000
        "%Y-%m-%d %H:%M:%S%.f", // 2026-03-14 09:30:00
        "%Y-%m-%dT%H:%M",       // 2026-03-14T09:30
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

/// Locale used for month/year display labels only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    #[default]
    EnUs,
    EnGb,
    EsEs,
    PtBr,
    FrFr,
    DeDe,
    ItIt,
}

impl DisplayLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::EsEs => "es-ES",
            Self::PtBr => "pt-BR",
            Self::FrFr => "fr-FR",
            Self::DeDe => "de-DE",
            Self::ItIt => "it-IT",
        }
    }

    pub fn chrono_locale(&self) -> chrono::Locale {
        match self {
            Self::EnUs => chrono::Locale::en_US,
            Self::EnGb => chrono::Locale::en_GB,
            Self::EsEs => chrono::Locale::es_ES,
            Self::PtBr => chrono::Locale::pt_BR,
            Self::FrFr => chrono::Locale::fr_FR,
            Self::DeDe => chrono::Locale::de_DE,
            Self::ItIt => chrono::Locale::it_IT,
        }
    }

    /// Lenient lookup: unknown tags fall back to en-US
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!(tag, "Unknown locale tag, using en-US");
            Self::EnUs
        })
    }
}

impl std::str::FromStr for DisplayLocale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_lowercase().as_str() {
            "en-us" | "en" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "es-es" | "es" => Ok(Self::EsEs),
            "pt-br" | "pt" => Ok(Self::PtBr),
            "fr-fr" | "fr" => Ok(Self::FrFr),
            "de-de" | "de" => Ok(Self::DeDe),
            "it-it" | "it" => Ok(Self::ItIt),
            _ => Err(format!(
                "Unknown locale: {} (valid: en-US, en-GB, es-ES, pt-BR, fr-FR, de-DE, it-IT)",
                s
            )),
        }
    }
}

impl std::fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ========== Report Models ==========

/// One month of the income/expense evolution series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub month_key: YearMonth,
    /// First day of the month
    pub date: NaiveDate,
    pub label: String,
    pub income_total: f64,
    /// Sum of absolute expense amounts
    pub expense_total: f64,
    /// Position in the series, starting at 0
    pub index: usize,
}

/// Gap-free monthly income/expense series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub points: Vec<EvolutionPoint>,
    /// Records dropped because their date could not be parsed
    pub skipped_records: usize,
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownItem {
    pub category: String,
    pub total_expense: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub transaction_count: usize,
    /// Share of all expenses (before top-N truncation), 0-100
    pub percentage: f64,
}

/// Top-N expense categories, largest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownReport {
    pub top_n: usize,
    /// Total expenses across every category, not only the listed ones
    pub total_expense: f64,
    pub items: Vec<CategoryBreakdownItem>,
    pub skipped_records: usize,
}

/// One month of the cumulative savings series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavingPoint {
    pub month_key: YearMonth,
    pub label: String,
    pub date: NaiveDate,
    pub index: usize,
    /// Cumulative net savings, set for months up to the current one
    pub real_value: Option<f64>,
    /// Forecast value, set for months after the current one. The last
    /// realized month repeats its real value here so both lines meet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_value: Option<f64>,
}

impl MonthlySavingPoint {
    pub fn is_projected(&self) -> bool {
        self.real_value.is_none() && self.projected_value.is_some()
    }
}

/// How the projected part of a savings series was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMethod {
    /// Least-squares line over two or more realized months
    Regression,
    /// Single realized month carried forward unchanged
    Flat,
    /// No realized months, nothing projected
    Unavailable,
}

impl ProjectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::Flat => "flat",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cumulative savings with a short forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub horizon_months: u32,
    pub method: ProjectionMethod,
    /// Fitted line over (index, cumulative value); flat projections have slope 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<crate::analytics::LinearTrend>,
    pub points: Vec<MonthlySavingPoint>,
    pub skipped_records: usize,
}

impl SavingsProjection {
    /// Cumulative value of the last realized month
    pub fn last_real_value(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.real_value)
    }

    /// Months carrying only a forecast value
    pub fn projected_points(&self) -> impl Iterator<Item = &MonthlySavingPoint> {
        self.points.iter().filter(|p| p.is_projected())
    }

    /// Sum of the month-over-month projected deltas, i.e. the change between
    /// the last realized value and the last projected one
    pub fn projected_change(&self) -> Option<f64> {
        let last_real = self.last_real_value()?;
        let last_projected = self.projected_points().last()?.projected_value?;
        Some(crate::analytics::round2(last_projected - last_real))
    }
}
