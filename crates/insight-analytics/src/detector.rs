//! Anomaly detection over the cleaned table.
//!
//! The target column is prepared once (numeric coercion, nulls dropped, seeded
//! downsampling to `max_samples`) and then scored by the configured method.

use insight_ingest::column_f64_values;
use insight_model::{AnalysisOptions, AnomalyMethod, AnomalyRecord, Severity};
use insight_transform::{ColumnKind, columns_of_kind, date_label};
use ndarray::{Array2, Axis};
use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use crate::isolation_forest::{IsolationForest, percentile};
use crate::sampling::sample_indices;
use crate::series::TargetSeries;
use crate::zscore;

/// Percentile of the decision scores at or below which a row is flagged.
pub const FOREST_FLAG_PERCENTILE: f64 = 2.0;
/// Margin below the flag threshold that marks a high-severity row.
pub const FOREST_HIGH_MARGIN: f64 = 0.1;

/// Label for row `position`: the date column's value when it has one, else
/// the position itself.
pub fn row_timestamp(cleaned: &DataFrame, date_column: Option<&str>, position: usize) -> String {
    date_column
        .and_then(|name| date_label(cleaned, name, position))
        .unwrap_or_else(|| position.to_string())
}

/// Numeric feature rows aligned to a target series.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    /// Row position in the cleaned table of each matrix row.
    pub positions: Vec<usize>,
    /// Cleaned target value of each matrix row.
    pub values: Vec<f64>,
    pub matrix: Array2<f64>,
}

impl FeatureMatrix {
    /// Numeric columns of `source` at the series positions, plus the series
    /// itself when `target` is not a numeric column of `source`. Rows with a
    /// missing feature are dropped. None when no row survives.
    pub fn build(source: &DataFrame, target: &str, series: &TargetSeries) -> Option<Self> {
        let features: Vec<(String, Vec<Option<f64>>)> = columns_of_kind(source, ColumnKind::Numeric)
            .into_iter()
            .filter_map(|name| column_f64_values(source, &name).map(|values| (name, values)))
            .collect();
        let append_target = !features.iter().any(|(name, _)| name == target);

        let mut columns: Vec<String> = features.iter().map(|(name, _)| name.clone()).collect();
        if append_target {
            columns.push(target.to_string());
        }
        let width = columns.len();

        let mut positions = Vec::new();
        let mut values = Vec::new();
        let mut data = Vec::with_capacity(series.len() * width);
        'rows: for (&position, &value) in series.positions.iter().zip(&series.values) {
            let start = data.len();
            for (_, column) in &features {
                match column.get(position).copied().flatten() {
                    Some(feature) => data.push(feature),
                    None => {
                        data.truncate(start);
                        continue 'rows;
                    }
                }
            }
            if append_target {
                data.push(value);
            }
            positions.push(position);
            values.push(value);
        }
        if positions.is_empty() {
            return None;
        }

        let matrix = Array2::from_shape_vec((positions.len(), width), data).ok()?;
        Some(Self {
            columns,
            positions,
            values,
            matrix,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Keep a seeded sample of at most `max_samples` rows, in row order.
    #[must_use]
    pub fn downsample(self, max_samples: Option<usize>, seed: u64) -> Self {
        let Some(picked) = sample_indices(self.len(), max_samples, seed) else {
            return self;
        };
        Self {
            positions: picked.iter().map(|idx| self.positions[*idx]).collect(),
            values: picked.iter().map(|idx| self.values[*idx]).collect(),
            matrix: self.matrix.select(Axis(0), &picked),
            columns: self.columns,
        }
    }
}

/// Anomaly detection stage, dispatched on [`AnomalyMethod`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    pub method: AnomalyMethod,
    /// Z-score cut-off; unused by the isolation forest.
    pub threshold: f64,
    pub max_samples: Option<usize>,
    pub seed: u64,
}

impl AnomalyDetector {
    pub fn from_options(options: &AnalysisOptions) -> Self {
        Self {
            method: options.anomaly_method,
            threshold: options.anomaly_threshold,
            max_samples: options.max_samples,
            seed: options.seed,
        }
    }

    /// Flag anomalous rows of `target`.
    ///
    /// `features` is the normalized table used as the isolation forest's
    /// feature source; the cleaned table's numeric columns are used when it is
    /// None. An absent or non-numeric target yields no records.
    pub fn detect(
        &self,
        cleaned: &DataFrame,
        target: &str,
        date_column: Option<&str>,
        features: Option<&DataFrame>,
    ) -> Vec<AnomalyRecord> {
        let span = info_span!("detect", method = %self.method, rows = cleaned.height());
        let _guard = span.enter();

        let Some(series) = TargetSeries::from_column(cleaned, target) else {
            debug!(column = target, "target column absent");
            return Vec::new();
        };
        let series = series.downsample(self.max_samples, self.seed);
        if series.is_empty() {
            debug!(column = target, "no numeric values to score");
            return Vec::new();
        }

        let records = match self.method {
            AnomalyMethod::Zscore => self.detect_zscore(cleaned, target, date_column, &series),
            AnomalyMethod::IsolationForest => {
                let source = features.unwrap_or(cleaned);
                self.detect_isolation_forest(cleaned, source, target, date_column, &series)
            }
        };
        debug!(points = series.len(), anomalies = records.len(), "detection complete");
        records
    }

    fn detect_zscore(
        &self,
        cleaned: &DataFrame,
        target: &str,
        date_column: Option<&str>,
        series: &TargetSeries,
    ) -> Vec<AnomalyRecord> {
        zscore::score(&series.values, self.threshold)
            .into_iter()
            .map(|hit| {
                let position = series.positions[hit.index];
                AnomalyRecord::from_z_score(
                    row_timestamp(cleaned, date_column, position),
                    target,
                    hit.severity,
                    hit.value,
                    hit.z_score,
                )
            })
            .collect()
    }

    fn detect_isolation_forest(
        &self,
        cleaned: &DataFrame,
        source: &DataFrame,
        target: &str,
        date_column: Option<&str>,
        series: &TargetSeries,
    ) -> Vec<AnomalyRecord> {
        let Some(features) = FeatureMatrix::build(source, target, series) else {
            debug!("no complete feature rows");
            return Vec::new();
        };
        let features = features.downsample(self.max_samples, self.seed);
        debug!(
            rows = features.len(),
            columns = features.columns.len(),
            "isolation forest features"
        );

        let mut forest = IsolationForest::new(self.seed);
        forest.fit(&features.matrix);
        let decision = forest.decision_function(&features.matrix);
        let Some(threshold) = percentile(&decision, FOREST_FLAG_PERCENTILE) else {
            return Vec::new();
        };

        decision
            .iter()
            .enumerate()
            .filter(|(_, score)| **score <= threshold)
            .map(|(row, score)| {
                let severity = if *score < threshold - FOREST_HIGH_MARGIN {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let position = features.positions[row];
                AnomalyRecord::from_score(
                    row_timestamp(cleaned, date_column, position),
                    target,
                    severity,
                    Some(features.values[row]),
                    *score,
                )
            })
            .collect()
    }
}
