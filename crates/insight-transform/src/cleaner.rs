//! Deterministic cleaning of a raw table.
//!
//! # Step Order
//!
//! 1. **Deduplicate** - remove exact duplicate rows (first occurrence kept)
//! 2. **Drop empty columns** - remove columns with no non-missing value
//! 3. **Type coercion** - numeric text becomes numeric, date text becomes
//!    datetime, anything else non-numeric becomes categorical text
//! 4. **Median fill** - missing numeric values take the column median
//! 5. **Mode fill** - missing categorical values take the column mode
//! 6. **Deduplicate again** - rows made identical by filling are removed
//!
//! Per-column failures never abort cleaning: a column that cannot be typed
//! or filled is passed through unchanged.

use std::collections::{BTreeMap, BTreeSet};

use insight_ingest::{any_to_string, column_f64_values, column_names, column_string_values};
use insight_model::{InsightError, Result};
use polars::prelude::{AnyValue, DataFrame};
use tracing::{debug, info_span};

use crate::datetime::parse_datetime;
use crate::frame_utils::{filter_rows, set_datetime_column, set_f64_column, set_string_column};
use crate::kind::{ColumnKind, columns_of_kind, is_string_column};
use crate::steps::StepLog;

/// Clean `df`, returning a new frame and the steps that were applied.
pub fn clean(df: &DataFrame) -> Result<(DataFrame, StepLog)> {
    let span = info_span!("clean", rows = df.height(), columns = df.width());
    let _guard = span.enter();

    let mut steps = StepLog::new();

    let (mut frame, removed) = drop_duplicate_rows(df)?;
    steps.push("drop_duplicates");
    if removed > 0 {
        steps.push(format!("drop_duplicates:removed={removed}"));
    }

    let empty = empty_columns(&frame);
    for name in &empty {
        frame = frame.drop(name).map_err(InsightError::frame)?;
    }
    steps.push_columns("drop_empty_columns", &empty);

    coerce_types(&mut frame, &mut steps)?;

    let filled = fill_numeric_median(&mut frame)?;
    steps.push_columns("fill_median", &filled);

    let filled = fill_categorical_mode(&mut frame)?;
    steps.push_columns("fill_mode", &filled);

    let (frame, removed) = drop_duplicate_rows(&frame)?;
    if removed > 0 {
        steps.push(format!("drop_duplicates_after_fill:removed={removed}"));
    }

    debug!(
        rows = frame.height(),
        columns = frame.width(),
        steps = steps.len(),
        "clean complete"
    );
    Ok((frame, steps))
}

fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell values of row `idx`; null and unreadable cells are None.
fn row_key(df: &DataFrame, idx: usize) -> Vec<Option<String>> {
    df.get_columns()
        .iter()
        .map(|column| match column.get(idx) {
            Ok(AnyValue::Null) | Err(_) => None,
            Ok(value) => Some(any_to_string(value)),
        })
        .collect()
}

/// Remove rows equal in every column to an earlier row.
fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    if df.width() == 0 || df.height() < 2 {
        return Ok((df.clone(), 0));
    }
    let mut seen: BTreeSet<Vec<Option<String>>> = BTreeSet::new();
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| seen.insert(row_key(df, idx)))
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }
    Ok((filter_rows(df, &keep)?, removed))
}

/// Columns where every value is missing. An empty table keeps its columns.
fn empty_columns(df: &DataFrame) -> Vec<String> {
    if df.height() == 0 {
        return Vec::new();
    }
    df.get_columns()
        .iter()
        .filter(|column| {
            (0..df.height()).all(|idx| match column.get(idx) {
                Ok(value) => is_missing(&value),
                Err(_) => true,
            })
        })
        .map(|column| column.name().to_string())
        .collect()
}

/// Type every non-numeric, non-temporal column.
fn coerce_types(frame: &mut DataFrame, steps: &mut StepLog) -> Result<()> {
    for name in column_names(frame) {
        let Ok(column) = frame.column(&name) else {
            continue;
        };
        if ColumnKind::of_column(column) != ColumnKind::Categorical {
            continue;
        }
        let is_text = is_string_column(column);
        let Some(values) = column_string_values(frame, &name) else {
            continue;
        };

        if !is_text {
            set_string_column(frame, &name, values)?;
            steps.push(format!("as_categorical:{name}"));
            continue;
        }

        if let Some(numbers) = parse_all_numeric(&values) {
            set_f64_column(frame, &name, numbers)?;
            steps.push(format!("coerce_numeric:{name}"));
            continue;
        }

        let parsed: Vec<_> = values
            .iter()
            .map(|value| value.as_deref().and_then(parse_datetime))
            .collect();
        if parsed.iter().any(Option::is_some) {
            set_datetime_column(frame, &name, &parsed)?;
            steps.push(format!("parse_datetime:{name}"));
        }
    }
    Ok(())
}

/// Parse every present value as a finite float; None if any value fails or
/// nothing is present.
fn parse_all_numeric(values: &[Option<String>]) -> Option<Vec<Option<f64>>> {
    let mut present = 0usize;
    let mut numbers = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Some(text) => {
                let number = text.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
                present += 1;
                numbers.push(Some(number));
            }
            None => numbers.push(None),
        }
    }
    (present > 0).then_some(numbers)
}

/// Median of the values; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties resolve to the lexically smallest.
pub fn mode(values: &[String]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

fn fill_numeric_median(frame: &mut DataFrame) -> Result<Vec<String>> {
    let mut filled = Vec::new();
    for name in columns_of_kind(frame, ColumnKind::Numeric) {
        let Some(values) = column_f64_values(frame, &name) else {
            continue;
        };
        if values.iter().all(Option::is_some) {
            continue;
        }
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let Some(fill) = median(&present) else {
            continue;
        };
        let values = values
            .into_iter()
            .map(|value| Some(value.unwrap_or(fill)))
            .collect();
        set_f64_column(frame, &name, values)?;
        filled.push(name);
    }
    Ok(filled)
}

fn fill_categorical_mode(frame: &mut DataFrame) -> Result<Vec<String>> {
    let mut filled = Vec::new();
    for name in columns_of_kind(frame, ColumnKind::Categorical) {
        let Some(values) = column_string_values(frame, &name) else {
            continue;
        };
        if values.iter().all(Option::is_some) {
            continue;
        }
        let present: Vec<String> = values.iter().flatten().cloned().collect();
        let Some(fill) = mode(&present) else {
            continue;
        };
        let values = values
            .into_iter()
            .map(|value| Some(value.unwrap_or_else(|| fill.clone())))
            .collect();
        set_string_column(frame, &name, values)?;
        filled.push(name);
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_even_and_odd_counts() {
        assert_eq!(median(&[10.0, 40.0, 10.0]), Some(10.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mode_prefers_smallest_on_ties() {
        let values = vec!["B".to_string(), "A".to_string(), "B".to_string()];
        assert_eq!(mode(&values), Some("B".to_string()));
        let tied = vec!["b".to_string(), "a".to_string()];
        assert_eq!(mode(&tied), Some("a".to_string()));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn parse_all_numeric_requires_every_value() {
        let values = vec![Some("1".to_string()), None, Some("2.5".to_string())];
        assert_eq!(
            parse_all_numeric(&values),
            Some(vec![Some(1.0), None, Some(2.5)])
        );
        let mixed = vec![Some("1".to_string()), Some("x".to_string())];
        assert_eq!(parse_all_numeric(&mixed), None);
        assert_eq!(parse_all_numeric(&[None]), None);
    }
}
