//! Notification-ready rendering of a statement summary
//!
//! Pure transformation, no I/O: takes an account identifier and a
//! [`StatementSummary`] and produces the [`TemplateData`] consumed by the
//! SendGrid dynamic template. Month keys are sorted lexicographically, which
//! is chronologically correct for the fixed-width `YYYY-MM` format.

use super::summary::StatementSummary;
use chrono::Month;
use serde::Serialize;

/// Template payload for one account's notification
///
/// Field names serialize exactly as the existing dynamic template expects
/// them; do not rename without updating the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateData {
    pub email: String,
    pub name: String,
    pub total_balance: String,
    pub first_month_year: String,
    pub last_month_year: String,
    pub avg_debit: String,
    pub avg_credit: String,
    pub month_summary: Vec<MonthOperation>,
}

/// One month's transaction count, chronologically ordered in the template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthOperation {
    pub month: String,
    pub transactions: u32,
}

#[derive(Debug, PartialEq)]
pub enum ReportError {
    /// A `month_summary` key did not contain a valid 1-12 month number
    InvalidMonth(String),
    /// The summary held no parsed transactions, so there is nothing to report
    EmptySummary,
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::InvalidMonth(raw) => write!(f, "invalid month key: {:?}", raw),
            ReportError::EmptySummary => write!(f, "statement has no parsed transactions"),
        }
    }
}

impl std::error::Error for ReportError {}

/// Build the notification payload for one account
///
/// Fails with [`ReportError`] if the summary is empty or any month key is
/// malformed; no partial report is produced.
pub fn build_template_data(
    account_id: &str,
    summary: &StatementSummary,
) -> Result<TemplateData, ReportError> {
    let mut keys: Vec<&str> = summary.month_summary.keys().map(String::as_str).collect();
    keys.sort_unstable();

    let first = keys.first().ok_or(ReportError::EmptySummary)?;
    let last = keys.last().ok_or(ReportError::EmptySummary)?;

    let mut month_operations = Vec::with_capacity(keys.len());
    for key in &keys {
        month_operations.push(MonthOperation {
            month: humanize_key(key)?,
            transactions: summary.month_summary.get(*key).copied().unwrap_or(0),
        });
    }

    Ok(TemplateData {
        email: account_id.to_string(),
        name: display_name(account_id),
        total_balance: format_amount(summary.total),
        first_month_year: humanize_key(first)?,
        last_month_year: humanize_key(last)?,
        // Empty buckets render as 0.00 in the template
        avg_debit: format_amount(summary.avg_debit.unwrap_or(0.0)),
        avg_credit: format_amount(summary.avg_credit.unwrap_or(0.0)),
        month_summary: month_operations,
    })
}

/// Render a month number and year as e.g. `"October of 2033"`
pub fn humanize_month(month_number: &str, year: &str) -> Result<String, ReportError> {
    let number: u8 = month_number
        .parse()
        .map_err(|_| ReportError::InvalidMonth(month_number.to_string()))?;
    let month =
        Month::try_from(number).map_err(|_| ReportError::InvalidMonth(month_number.to_string()))?;
    Ok(format!("{} of {}", month.name(), year))
}

/// Humanize a `YYYY-MM` grouping key
fn humanize_key(key: &str) -> Result<String, ReportError> {
    match key.split_once('-') {
        Some((year, month)) => humanize_month(month, year),
        None => Err(ReportError::InvalidMonth(key.to_string())),
    }
}

/// Derive a display name from an account identifier
///
/// Takes the portion before the first `@` and capitalizes the first letter
/// of each whitespace-separated word.
fn display_name(account_id: &str) -> String {
    let local_part = account_id.split('@').next().unwrap_or("");
    local_part
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fixed two-decimal rendering of monetary values
fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn summary(months: &[(&str, u32)]) -> StatementSummary {
        StatementSummary {
            total: 50.0,
            avg_credit: Some(35.5),
            avg_debit: Some(-40.66),
            month_summary: months
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<String, u32>>(),
        }
    }

    #[test]
    fn builds_template_data() {
        let report =
            build_template_data("user@mail.com", &summary(&[("2022-08", 3), ("2022-09", 5)]))
                .unwrap();

        assert_eq!(report.email, "user@mail.com");
        assert_eq!(report.name, "User");
        assert_eq!(report.total_balance, "50.00");
        assert_eq!(report.first_month_year, "August of 2022");
        assert_eq!(report.last_month_year, "September of 2022");
        assert_eq!(report.avg_debit, "-40.66");
        assert_eq!(report.avg_credit, "35.50");
        assert_eq!(
            report.month_summary,
            vec![
                MonthOperation {
                    month: "August of 2022".to_string(),
                    transactions: 3,
                },
                MonthOperation {
                    month: "September of 2022".to_string(),
                    transactions: 5,
                },
            ]
        );
    }

    #[test]
    fn month_entries_follow_chronological_key_order() {
        let report = build_template_data(
            "user@mail.com",
            &summary(&[("2022-11", 1), ("2021-12", 2), ("2022-01", 3)]),
        )
        .unwrap();

        assert_eq!(report.first_month_year, "December of 2021");
        assert_eq!(report.last_month_year, "November of 2022");
        let months: Vec<&str> = report
            .month_summary
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(
            months,
            vec!["December of 2021", "January of 2022", "November of 2022"]
        );
    }

    #[test]
    fn fails_on_malformed_month_key() {
        let err = build_template_data(
            "user@mail.com",
            &summary(&[("2022-eee", 3), ("2022-09", 5)]),
        )
        .unwrap_err();

        assert_eq!(err, ReportError::InvalidMonth("eee".to_string()));
    }

    #[test]
    fn fails_on_empty_summary() {
        let err = build_template_data("user@mail.com", &summary(&[])).unwrap_err();
        assert_eq!(err, ReportError::EmptySummary);
    }

    #[test]
    fn humanizes_valid_month() {
        assert_eq!(humanize_month("10", "2033").unwrap(), "October of 2033");
        assert_eq!(humanize_month("01", "2020").unwrap(), "January of 2020");
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(humanize_month("13", "2033").is_err());
        assert!(humanize_month("0", "2033").is_err());
    }

    #[test]
    fn rejects_non_numeric_month() {
        assert!(humanize_month("sup", "2033").is_err());
    }

    #[test]
    fn display_name_capitalizes_each_word() {
        assert_eq!(display_name("user@mail.com"), "User");
        assert_eq!(display_name("jane doe@mail.com"), "Jane Doe");
        assert_eq!(display_name("@mail.com"), "");
    }

    #[test]
    fn empty_buckets_render_as_zero() {
        let one_sided = StatementSummary {
            total: 60.5,
            avg_credit: None,
            avg_debit: Some(60.5),
            month_summary: HashMap::from([("2021-07".to_string(), 1)]),
        };
        let report = build_template_data("user@mail.com", &one_sided).unwrap();

        assert_eq!(report.avg_credit, "0.00");
        assert_eq!(report.avg_debit, "60.50");
    }
}
