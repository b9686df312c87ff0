//! Column construction and row filtering helpers.

use chrono::NaiveDateTime;
use insight_model::{InsightError, Result};
use polars::prelude::*;

pub(crate) fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series).map_err(InsightError::frame)?;
    Ok(())
}

pub(crate) fn set_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series).map_err(InsightError::frame)?;
    Ok(())
}

pub(crate) fn set_datetime_column(
    df: &mut DataFrame,
    name: &str,
    values: &[Option<NaiveDateTime>],
) -> Result<()> {
    let series = datetime_series(name, values)?;
    df.with_column(series).map_err(InsightError::frame)?;
    Ok(())
}

/// Millisecond-precision datetime series.
pub(crate) fn datetime_series(name: &str, values: &[Option<NaiveDateTime>]) -> Result<Series> {
    let millis: Vec<Option<i64>> = values
        .iter()
        .map(|value| value.map(|dt| dt.and_utc().timestamp_millis()))
        .collect();
    Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .map_err(InsightError::frame)
}

pub(crate) fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask).map_err(InsightError::frame)
}
