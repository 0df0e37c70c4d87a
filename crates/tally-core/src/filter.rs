//! Transaction filter builder shared by every analytics screen
//!
//! Screens narrow the record set (search text, category, kind, date range)
//! before handing it to the aggregators. This builder holds those options in
//! one place instead of each screen composing its own boolean expression.

use chrono::NaiveDate;

use crate::models::{labels_match, Transaction, TransactionKind};

/// Builder for transaction match predicates
///
/// The lifetime `'query` represents how long the borrowed filter parameters
/// (search text, category label) must remain valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter<'query> {
    pub search: Option<&'query str>,
    pub category: Option<&'query str>,
    pub kind: Option<TransactionKind>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search text (case-insensitive, matches category or description)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Set category filter (case-insensitive exact label)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Set transaction kind filter
    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }

    /// Set inclusive date range filter
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    /// Whether no option narrows the set
    pub fn is_empty(&self) -> bool {
        non_blank(self.search).is_none()
            && non_blank(self.category).is_none()
            && self.kind.is_none()
            && self.date_range.is_none()
    }

    /// Check a single record against every configured option
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        if let Some(category) = non_blank(self.category) {
            if !labels_match(&tx.category, category) {
                return false;
            }
        }

        if let Some(q) = non_blank(self.search) {
            let needle = q.to_lowercase();
            let in_category = tx.category.to_lowercase().contains(&needle);
            let in_description = tx
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_category && !in_description {
                return false;
            }
        }

        // Records with an unreadable date never satisfy a date range
        if let Some((from, to)) = self.date_range {
            match tx.parsed_date() {
                Some(dt) if dt.date() >= from && dt.date() <= to => {}
                _ => return false,
            }
        }

        true
    }

    /// Copy out the matching records, keeping their order
    pub fn apply(&self, records: &[Transaction]) -> Vec<Transaction> {
        let matched: Vec<Transaction> = records
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect();

        tracing::debug!(
            total = records.len(),
            matched = matched.len(),
            "Transaction filter applied"
        );

        matched
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
