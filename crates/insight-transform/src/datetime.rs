//! Date/time parsing and ISO 8601 formatting.
//!
//! Text values are tried against a fixed list of formats, most specific
//! first. Temporal polars values are converted directly.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use insight_ingest::any_to_string_non_empty;
use polars::prelude::{AnyValue, DataFrame, TimeUnit};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Format a timestamp as ISO 8601, with fractional seconds only when present.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parse a text value as a datetime.
///
/// Plain numbers are rejected so numeric identifiers never turn into dates.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    try_parse_datetime(trimmed)
        .or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
        .or_else(|| try_parse_year_month(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S", // European
        "%d/%m/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",  // US first, matching month-first parsers
        "%d/%m/%Y",  // European: 15/01/2024
        "%d.%m.%Y",  // German: 15.01.2024
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// `YYYY-MM` resolves to the first day of the month.
fn try_parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn timestamp_to_datetime(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
    };
    Some(dt.naive_utc())
}

/// Convert a cell to a datetime: temporal values directly, text by parsing.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Datetime(ts, unit, _) => timestamp_to_datetime(ts, unit),
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_CE_DAYS)
            .map(|d| d.and_time(NaiveTime::MIN)),
        AnyValue::String(s) => parse_datetime(s),
        AnyValue::StringOwned(s) => parse_datetime(&s),
        _ => None,
    }
}

/// Collect a column as optional datetimes; None when the column is absent.
pub fn column_datetime_values(df: &DataFrame, name: &str) -> Option<Vec<Option<NaiveDateTime>>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_datetime(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}

/// Label for row `idx` of a date column: ISO 8601 when the value is a date,
/// its text otherwise. None when the column is absent or the cell is null.
pub fn date_label(df: &DataFrame, name: &str, idx: usize) -> Option<String> {
    let column = df.column(name).ok()?;
    let value = column.get(idx).ok()?;
    match any_to_datetime(value.clone()) {
        Some(dt) => Some(format_timestamp(dt)),
        None => any_to_string_non_empty(value),
    }
}
