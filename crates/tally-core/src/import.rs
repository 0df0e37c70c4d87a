//! Transaction record loaders (CSV and JSON)
//!
//! Dates are kept as text so the aggregators decide what is usable; only rows
//! with an unknown type, an unreadable amount or (for JSON) a malformed shape
//! are dropped here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionKind};

/// Counters for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub loaded: usize,
    pub skipped: usize,
}

/// Records read from one source plus load counters
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub transactions: Vec<Transaction>,
    pub stats: ImportStats,
}

impl LoadedRecords {
    fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
        self.stats.loaded += 1;
    }

    /// Drop one record; `record` is its 1-based position in the input
    fn skip(&mut self, record: usize, reason: &Error) {
        warn!(record, %reason, "Skipping transaction row");
        self.stats.skipped += 1;
    }
}

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Detect format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Some(Self::Csv),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load records from a `.csv` or `.json` file
pub fn load_path(path: &Path) -> Result<LoadedRecords> {
    let format = InputFormat::from_path(path).ok_or_else(|| {
        Error::Import(format!(
            "Unsupported input file: {} (expected .csv or .json)",
            path.display()
        ))
    })?;

    let reader = BufReader::new(File::open(path)?);
    let loaded = match format {
        InputFormat::Csv => load_csv(reader)?,
        InputFormat::Json => load_json(reader)?,
    };

    debug!(
        path = %path.display(),
        loaded = loaded.stats.loaded,
        skipped = loaded.stats.skipped,
        "Loaded transactions"
    );
    Ok(loaded)
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    kind: usize,
    amount: usize,
    category: usize,
    icon: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| Error::Import(format!("Missing column: {}", names[0])))
        };

        Ok(Self {
            date: require(&["date", "transaction date"])?,
            kind: require(&["type", "kind"])?,
            amount: require(&["amount", "value"])?,
            category: require(&["category"])?,
            icon: find(&["icon", "tag"]),
            description: find(&["description", "memo"]),
        })
    }
}

/// Load records from CSV with a header row
///
/// Required columns: date, type, amount, category. Optional: icon, description.
pub fn load_csv<R: Read>(reader: R) -> Result<LoadedRecords> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut loaded = LoadedRecords::default();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let position = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("");
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let kind = match parse_kind(field(columns.kind)) {
            Ok(kind) => kind,
            Err(e) => {
                loaded.skip(position, &e);
                continue;
            }
        };
        let amount = match parse_amount(field(columns.amount)) {
            Ok(amount) => amount,
            Err(e) => {
                loaded.skip(position, &e);
                continue;
            }
        };

        loaded.push(Transaction {
            date: field(columns.date).to_string(),
            kind,
            amount,
            category: field(columns.category).to_string(),
            icon: optional(columns.icon),
            description: optional(columns.description),
        });
    }

    debug!("Parsed {} CSV transactions", loaded.stats.loaded);
    Ok(loaded)
}

/// Amount as written in JSON: a number or a formatted string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    date: String,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    amount: RawAmount,
    #[serde(default)]
    category: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl RawRecord {
    fn into_transaction(self) -> Result<Transaction> {
        let kind = parse_kind(&self.kind)?;
        let amount = match self.amount {
            RawAmount::Number(n) => n,
            RawAmount::Text(s) => parse_amount(&s)?,
        };

        Ok(Transaction {
            date: self.date,
            kind,
            amount,
            category: self.category,
            icon: self.icon.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
        })
    }
}

/// Load records from a JSON array
///
/// The array itself must be valid JSON; an element that does not have the
/// record shape (missing type, null amount, non-text date) is skipped.
pub fn load_json<R: Read>(reader: R) -> Result<LoadedRecords> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    let mut loaded = LoadedRecords::default();

    for (i, value) in values.into_iter().enumerate() {
        let position = i + 1;
        let parsed = serde_json::from_value::<RawRecord>(value)
            .map_err(|e| Error::InvalidData(format!("Malformed record: {}", e)))
            .and_then(RawRecord::into_transaction);

        match parsed {
            Ok(tx) => loaded.push(tx),
            Err(e) => loaded.skip(position, &e),
        }
    }

    debug!("Parsed {} JSON transactions", loaded.stats.loaded);
    Ok(loaded)
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    s.parse().map_err(Error::InvalidData)
}

/// Parse an amount string, handling currency symbols and separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '€', '£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::InvalidData(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert_eq!(parse_amount(" € 12 ").unwrap(), 12.0);
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_load_csv() {
        let csv = "Date,Type,Amount,Category,Icon,Description
2026-01-05,income,\"$1,000.00\",Salary,,ACME payroll
2026-01-20,expense,-45.10,Groceries,🛒,
not-a-date,expense,5,Coffee,,
2026-01-21,refund,5,Coffee,,
2026-01-22,expense,abc,Coffee,,";

        let loaded = load_csv(csv.as_bytes()).unwrap();

        assert_eq!(loaded.stats, ImportStats { loaded: 3, skipped: 2 });
        assert_eq!(loaded.transactions[0].amount, 1000.0);
        assert_eq!(
            loaded.transactions[0].description.as_deref(),
            Some("ACME payroll")
        );
        assert_eq!(loaded.transactions[1].icon.as_deref(), Some("🛒"));
        assert_eq!(loaded.transactions[1].kind, TransactionKind::Expense);
        // Bad dates are left for the aggregators to skip
        assert_eq!(loaded.transactions[2].date, "not-a-date");
        assert!(loaded.transactions[2].icon.is_none());
    }

    #[test]
    fn test_load_csv_header_aliases_and_order() {
        let csv = "category,value,kind,transaction date\nRent,900,expense,2026-02-01\n";

        let loaded = load_csv(csv.as_bytes()).unwrap();

        assert_eq!(loaded.transactions.len(), 1);
        let tx = &loaded.transactions[0];
        assert_eq!(tx.category, "Rent");
        assert_eq!(tx.amount, 900.0);
        assert_eq!(tx.date, "2026-02-01");
    }

    #[test]
    fn test_load_csv_missing_column() {
        let csv = "date,amount,category\n2026-02-01,900,Rent\n";
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing column: type"));
    }

    #[test]
    fn test_load_json() {
        let json = r#"[
            {"date": "2026-03-01T10:00:00Z", "type": "expense", "amount": 12.5, "category": "Food", "icon": "🍔"},
            {"date": "2026-03-02", "kind": "income", "amount": "$2,000", "category": "Salary"},
            {"date": "2026-03-03", "type": "gift", "amount": 1, "category": "Other"},
            {"date": "2026-03-04", "type": "expense", "amount": "n/a", "category": "Food"}
        ]"#;

        let loaded = load_json(json.as_bytes()).unwrap();

        assert_eq!(loaded.stats, ImportStats { loaded: 2, skipped: 2 });
        assert_eq!(loaded.transactions[0].icon.as_deref(), Some("🍔"));
        assert_eq!(loaded.transactions[1].amount, 2000.0);
        assert_eq!(loaded.transactions[1].kind, TransactionKind::Income);
    }

    #[test]
    fn test_load_json_skips_malformed_records() {
        let json = r#"[
            {"date": "2026-03-01", "type": "expense", "amount": 12.5, "category": "Food"},
            {"date": "2026-03-02", "type": "expense", "amount": null, "category": "Food"},
            {"date": "2026-03-03", "amount": 8, "category": "Food"},
            {"date": 20260304, "type": "income", "amount": 100, "category": "Salary"},
            "not a record"
        ]"#;

        let loaded = load_json(json.as_bytes()).unwrap();

        assert_eq!(loaded.stats, ImportStats { loaded: 1, skipped: 4 });
        assert_eq!(loaded.transactions[0].date, "2026-03-01");
    }

    #[test]
    fn test_row_errors_are_invalid_data() {
        assert!(matches!(parse_amount("abc"), Err(Error::InvalidData(_))));
        assert!(matches!(parse_kind("refund"), Err(Error::InvalidData(_))));
        assert_eq!(parse_kind(" Income ").unwrap(), TransactionKind::Income);
    }

    #[test]
    fn test_load_json_not_an_array() {
        let err = load_json(r#"{"date": "2026-03-01"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("records.CSV");
        let mut file = File::create(&csv_path).unwrap();
        writeln!(file, "date,type,amount,category").unwrap();
        writeln!(file, "2026-01-01,expense,10,Food").unwrap();
        assert_eq!(load_path(&csv_path).unwrap().transactions.len(), 1);

        let txt_path = dir.path().join("records.txt");
        File::create(&txt_path).unwrap();
        assert!(matches!(load_path(&txt_path), Err(Error::Import(_))));
    }
}
