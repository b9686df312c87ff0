//! Feature preparation for anomaly detection.
//!
//! Numeric columns are standardized with population statistics; categorical
//! columns are one-hot encoded with the first (lexically smallest) level
//! dropped. Datetime columns pass through. Row count and order are preserved.

use std::collections::BTreeSet;

use insight_ingest::{column_f64_values, column_string_values};
use insight_model::{InsightError, Result};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, info_span};

use crate::kind::ColumnKind;
use crate::steps::StepLog;

/// Population mean and standard deviation of the values.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Standardize values; a column without spread becomes all zeros.
pub fn standardize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    match mean_std(&present) {
        Some((mean, std)) if std.is_finite() && std > 0.0 => values
            .iter()
            .map(|value| value.map(|v| (v - mean) / std))
            .collect(),
        _ => vec![Some(0.0); values.len()],
    }
}

fn unique_name(taken: &BTreeSet<String>, candidate: String) -> String {
    if !taken.contains(&candidate) {
        return candidate;
    }
    let mut suffix = 1usize;
    loop {
        let name = format!("{candidate}_{suffix}");
        if !taken.contains(&name) {
            return name;
        }
        suffix += 1;
    }
}

/// Normalize `df`, returning a new frame and the steps that were applied.
pub fn normalize(df: &DataFrame) -> Result<(DataFrame, StepLog)> {
    let span = info_span!("normalize", rows = df.height(), columns = df.width());
    let _guard = span.enter();

    let mut steps = StepLog::new();
    let mut retained: Vec<Column> = Vec::new();
    let mut indicators: Vec<(String, Vec<f64>)> = Vec::new();
    let mut standardized = Vec::new();
    let mut encoded = Vec::new();

    for column in df.get_columns() {
        let name = column.name().to_string();
        match ColumnKind::of_column(column) {
            ColumnKind::Numeric => {
                let Some(values) = column_f64_values(df, &name) else {
                    continue;
                };
                retained.push(Series::new(name.as_str().into(), standardize(&values)).into_column());
                standardized.push(name);
            }
            ColumnKind::Categorical => {
                let Some(values) = column_string_values(df, &name) else {
                    continue;
                };
                let levels: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
                for level in levels.iter().skip(1) {
                    let indicator = values
                        .iter()
                        .map(|value| {
                            if value.as_deref() == Some(*level) {
                                1.0
                            } else {
                                0.0
                            }
                        })
                        .collect();
                    indicators.push((format!("{name}_{level}"), indicator));
                }
                encoded.push(name);
            }
            ColumnKind::Datetime => retained.push(column.clone()),
        }
    }

    let mut taken: BTreeSet<String> = retained
        .iter()
        .map(|column| column.name().to_string())
        .collect();
    let mut columns = retained;
    for (candidate, values) in indicators {
        let name = unique_name(&taken, candidate);
        columns.push(Series::new(name.as_str().into(), values).into_column());
        taken.insert(name);
    }

    let frame = if columns.is_empty() {
        DataFrame::empty_with_height(df.height())
    } else {
        DataFrame::new(columns).map_err(InsightError::frame)?
    };

    steps.push_columns("standardize", &standardized);
    steps.push_columns("one_hot_encode", &encoded);
    debug!(
        rows = frame.height(),
        columns = frame.width(),
        standardized = standardized.len(),
        encoded = encoded.len(),
        "normalize complete"
    );
    Ok((frame, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_variance_becomes_zero() {
        assert_eq!(
            standardize(&[Some(5.0), Some(5.0), Some(5.0)]),
            vec![Some(0.0); 3]
        );
    }

    #[test]
    fn standardize_uses_population_std() {
        let out = standardize(&[Some(1.0), Some(3.0)]);
        assert_eq!(out, vec![Some(-1.0), Some(1.0)]);
    }

    #[test]
    fn unique_name_appends_suffix() {
        let taken: BTreeSet<String> = ["a_x".to_string(), "a_x_1".to_string()].into();
        assert_eq!(unique_name(&taken, "a_x".to_string()), "a_x_2");
        assert_eq!(unique_name(&taken, "b".to_string()), "b");
    }
}
