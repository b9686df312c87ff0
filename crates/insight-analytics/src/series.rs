//! Target series preparation shared by the detector and the forecaster.

use insight_ingest::column_f64_values;
use polars::prelude::DataFrame;

use crate::sampling::sample_indices;

/// Non-null numeric values of one column, with their row positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSeries {
    /// Row position of each value in the source table.
    pub positions: Vec<usize>,
    pub values: Vec<f64>,
}

impl TargetSeries {
    /// Coerce `name` to numbers and drop missing entries. None when the
    /// column is absent.
    pub fn from_column(df: &DataFrame, name: &str) -> Option<Self> {
        let raw = column_f64_values(df, name)?;
        let (positions, values) = raw
            .into_iter()
            .enumerate()
            .filter_map(|(pos, value)| value.map(|v| (pos, v)))
            .unzip();
        Some(Self { positions, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep a seeded sample of at most `max_samples` points, in row order.
    #[must_use]
    pub fn downsample(self, max_samples: Option<usize>, seed: u64) -> Self {
        match sample_indices(self.len(), max_samples, seed) {
            Some(picked) => Self {
                positions: picked.iter().map(|idx| self.positions[*idx]).collect(),
                values: picked.iter().map(|idx| self.values[*idx]).collect(),
            },
            None => self,
        }
    }

    /// Arithmetic mean; None for an empty series.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.len() as f64)
    }
}
