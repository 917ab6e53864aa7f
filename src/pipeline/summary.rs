//! Per-account statement aggregation
//!
//! Consumes one account's transaction CSV (header row first, then
//! `id,date,signed-amount` data rows) and folds it into a
//! [`StatementSummary`] in a single pass: running total, credit/debit
//! averages, and transaction counts grouped by `YYYY-MM`.
//!
//! Malformed rows are a per-record problem: they are logged and skipped so
//! one bad row never aborts the whole file. Structural CSV errors (wrong
//! field count, unreadable input) abort the file and are handled upstream by
//! the batch runner.

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;

/// Aggregated statistics for one account's statement
///
/// `avg_credit`/`avg_debit` are `None` when the account has no transactions
/// in that bucket; an average over an empty bucket is never computed.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSummary {
    /// Sum of all parsed amounts (credits are negative)
    pub total: f64,
    /// Arithmetic mean of the strictly negative amounts
    pub avg_credit: Option<f64>,
    /// Arithmetic mean of the non-negative amounts
    pub avg_debit: Option<f64>,
    /// Transaction count per `YYYY-MM` key (unordered)
    pub month_summary: HashMap<String, u32>,
}

/// A transaction row that could not be interpreted
///
/// Recoverable at the row level: the row is skipped and aggregation
/// continues.
#[derive(Debug)]
pub struct RowError {
    raw: String,
    reason: &'static str,
}

impl RowError {
    fn new(raw: &str, reason: &'static str) -> Self {
        Self {
            raw: raw.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.reason, self.raw)
    }
}

impl std::error::Error for RowError {}

/// Parse a signed amount string
///
/// The first character is a mandatory `+`/`-` sign; the remainder is a
/// decimal magnitude. `-` negates the magnitude.
pub fn parse_amount(raw: &str) -> Result<f64, RowError> {
    let mut chars = raw.chars();
    let sign = match chars.next() {
        Some('+') => 1.0,
        Some('-') => -1.0,
        _ => return Err(RowError::new(raw, "amount is missing its sign prefix")),
    };
    let magnitude: f64 = chars
        .as_str()
        .parse()
        .map_err(|_| RowError::new(raw, "malformed amount magnitude"))?;
    Ok(sign * magnitude)
}

/// Aggregate one account's statement CSV into a [`StatementSummary`]
///
/// The first row is a header and is discarded regardless of content. Data
/// rows carry exactly 3 fields: an unused identifier, a date whose first 7
/// characters form the `YYYY-MM` grouping key, and a signed amount.
/// Negative amounts land in the credit bucket, non-negative amounts in the
/// debit bucket (the caller's sign convention).
pub fn summarize<R: Read>(input: R) -> Result<StatementSummary, csv::Error> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let mut total = 0.0;
    let mut credit: Vec<f64> = Vec::new();
    let mut debit: Vec<f64> = Vec::new();
    let mut month_summary: HashMap<String, u32> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        let date = record.get(1).unwrap_or("");
        let raw_amount = record.get(2).unwrap_or("");

        // Either the whole row counts or none of it does, so the month
        // counters always match the rows reflected in the totals.
        let month_key = match date.get(..7) {
            Some(key) => key,
            None => {
                log::warn!("skipping row with short date field: {:?}", date);
                continue;
            }
        };
        let amount = match parse_amount(raw_amount) {
            Ok(amount) => amount,
            Err(e) => {
                log::warn!("skipping row: {}", e);
                continue;
            }
        };

        total += amount;
        if amount < 0.0 {
            credit.push(amount);
        } else {
            debit.push(amount);
        }
        *month_summary.entry(month_key.to_string()).or_insert(0) += 1;
    }

    Ok(StatementSummary {
        total,
        avg_credit: average(&credit),
        avg_debit: average(&debit),
        month_summary,
    })
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
