//! Time bucketing
//!
//! Maps an order timestamp to a bucket key for a given granularity.
//! Keys are chosen so that lexicographic order is chronological order:
//! day, week, and month buckets render as ISO dates, year buckets as
//! the bare year.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::Granularity;

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Format a date as YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Get the Monday of the ISO week containing the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - chrono::Duration::days(days_from_monday as i64)
}

/// Get the first day of the month containing the given date
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists
    date.with_day(1).unwrap_or(date)
}

/// Map a timestamp to its bucket key under the given granularity
pub fn bucket_key(timestamp: NaiveDateTime, granularity: Granularity) -> String {
    let date = timestamp.date();
    match granularity {
        Granularity::Day => format_date(date),
        Granularity::Week => format_date(week_start(date)),
        Granularity::Month => format_date(month_start(date)),
        Granularity::Year => date.year().to_string(),
    }
}
