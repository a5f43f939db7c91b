//! Column conversion helpers and SQLite batching utilities.
//!
//! Decimals are stored as TEXT, dates as `YYYY-MM-DD` and sync timestamps as
//! fixed-width RFC3339 so that string comparison orders them correctly.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

/// Maximum number of parameters for SQLite `IN (...)` queries.
///
/// SQLite caps bound parameters per statement (999 on older builds); 500
/// leaves room for the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Splits a slice into chunks that fit an `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Parses a stored decimal, logging and falling back to zero on bad data.
pub fn parse_decimal(value: &str, field_name: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
            field_name,
            value,
            e
        );
        Decimal::ZERO
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored date. Bad data falls back to the epoch date and is logged.
pub fn parse_date(value: &str, field_name: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|e| {
        log::error!("Failed to parse {} '{}' as date: {}", field_name, value, e);
        NaiveDate::default()
    })
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::error!("Failed to parse timestamp '{}': {}", value, e);
            DateTime::<Utc>::default()
        })
}
