use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{Result, SummaryError};

// ── Month labels ──────────────────────────────────────────────────────────────

fn month_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})\.(0[1-9]|1[0-2])$").expect("regex is valid"))
}

/// Parse a `YYYY.MM` month label into `(year, month)`.
pub fn parse_month_label(label: &str) -> Result<(i32, u32)> {
    let caps = month_label_regex()
        .captures(label)
        .ok_or_else(|| SummaryError::InvalidMonth(label.to_string()))?;

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| SummaryError::InvalidMonth(label.to_string()))?;
    let month: u32 = caps[2]
        .parse()
        .map_err(|_| SummaryError::InvalidMonth(label.to_string()))?;

    Ok((year, month))
}

/// `true` when `label` is a well-formed `YYYY.MM` month.
pub fn is_valid_month_label(label: &str) -> bool {
    month_label_regex().is_match(label)
}

/// Name of the inventory extract for `month`, e.g. `"2024.01.csv"`.
pub fn inventory_file_name(month: &str) -> String {
    format!("{}.csv", month)
}

// ── Day counts ────────────────────────────────────────────────────────────────

/// Number of calendar days in `month` of `year`.
///
/// Returns `None` when `month` is outside `1..=12` or the year is out of
/// chrono's range.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Number of calendar days in the month a `YYYY.MM` label names.
pub fn days_in_month_label(label: &str) -> Result<u32> {
    let (year, month) = parse_month_label(label)?;
    days_in_month(year, month).ok_or_else(|| SummaryError::InvalidMonth(label.to_string()))
}

/// Format a date as its `YYYY.MM` month label.
pub fn month_label_of(date: NaiveDate) -> String {
    format!("{:04}.{:02}", date.year(), date.month())
}

/// Every month label from `start` to `end`, both inclusive.
///
/// An `end` before `start` yields an empty list.
pub fn month_range(start: &str, end: &str) -> Result<Vec<String>> {
    let (start_year, start_month) = parse_month_label(start)?;
    let (end_year, end_month) = parse_month_label(end)?;

    let mut current = NaiveDate::from_ymd_opt(start_year, start_month, 1)
        .ok_or_else(|| SummaryError::InvalidMonth(start.to_string()))?;
    let last = NaiveDate::from_ymd_opt(end_year, end_month, 1)
        .ok_or_else(|| SummaryError::InvalidMonth(end.to_string()))?;

    let mut months = Vec::new();
    while current <= last {
        months.push(month_label_of(current));
        current = match current.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(months)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
