//! Isolation forest scoring.
//!
//! Anomalies are isolated in fewer random splits than normal points, so a
//! short average path length across the forest means an anomalous row. The
//! decision score is `0.5 - s` where `s = 2^(-E[h] / c(n))`; lower is more
//! anomalous and zero is the automatic contamination boundary.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation tree node
#[derive(Debug, Clone)]
pub enum IsolationTree {
    Internal {
        feature: usize,
        /// Rows with `value < threshold` go left.
        threshold: f64,
        left: Box<IsolationTree>,
        right: Box<IsolationTree>,
    },
    External {
        size: usize,
    },
}

impl IsolationTree {
    pub fn build(
        x: &Array2<f64>,
        rows: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let size = rows.len();
        if height >= max_height || size <= 1 {
            return IsolationTree::External { size };
        }

        let feature = rng.gen_range(0..x.ncols());
        let (min, max) = rows
            .iter()
            .map(|&row| x[[row, feature]])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if max - min < 1e-10 {
            return IsolationTree::External { size };
        }

        // `max - min` may overflow for extreme values.
        let fraction: f64 = rng.r#gen();
        let threshold = min * (1.0 - fraction) + max * fraction;
        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.iter().partition(|&&row| x[[row, feature]] < threshold);
        if left.is_empty() || right.is_empty() {
            return IsolationTree::External { size };
        }

        IsolationTree::Internal {
            feature,
            threshold,
            left: Box::new(Self::build(x, &left, height + 1, max_height, rng)),
            right: Box::new(Self::build(x, &right, height + 1, max_height, rng)),
        }
    }

    /// Depth at which `sample` reaches a leaf, adjusted by the expected
    /// remaining depth of the leaf's unsplit rows.
    pub fn path_length(&self, sample: ArrayView1<'_, f64>, depth: usize) -> f64 {
        match self {
            IsolationTree::External { size } => depth as f64 + average_path_length(*size),
            IsolationTree::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] < *threshold {
                    left.path_length(sample, depth + 1)
                } else {
                    right.path_length(sample, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful binary-search-tree lookup over
/// `n` items: `2 H(n-1) - 2(n-1)/n`.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    seed: u64,
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    pub fn new(seed: u64) -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            seed,
            trees: Vec::new(),
            sample_size: 0,
        }
    }

    #[must_use]
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    /// Grow the forest on `x`. Each tree sees `min(max_samples, rows)` rows
    /// drawn without replacement.
    pub fn fit(&mut self, x: &Array2<f64>) {
        let n_rows = x.nrows();
        self.trees.clear();
        self.sample_size = self.max_samples.min(n_rows);
        if n_rows == 0 || x.ncols() == 0 {
            return;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let max_height = (self.sample_size.max(2) as f64).log2().ceil() as usize;
        self.trees = (0..self.n_estimators)
            .map(|_| {
                let rows = index::sample(&mut rng, n_rows, self.sample_size).into_vec();
                IsolationTree::build(x, &rows, 0, max_height, &mut rng)
            })
            .collect();
    }

    /// Anomaly score `s` in (0, 1] per row; higher is more anomalous.
    pub fn score_samples(&self, x: &Array2<f64>) -> Vec<f64> {
        if self.trees.is_empty() {
            return vec![0.5; x.nrows()];
        }
        let normalizer = average_path_length(self.sample_size);
        x.rows()
            .into_iter()
            .map(|row| {
                let mean_path = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(row, 0))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                let exponent = if normalizer > 0.0 {
                    -mean_path / normalizer
                } else {
                    -1.0
                };
                2.0_f64.powf(exponent)
            })
            .collect()
    }

    /// Decision score per row: `0.5 - s`. Negative rows are outliers under
    /// automatic contamination.
    pub fn decision_function(&self, x: &Array2<f64>) -> Vec<f64> {
        self.score_samples(x)
            .into_iter()
            .map(|score| 0.5 - score)
            .collect()
    }
}

/// Percentile `q` (0 to 100) with linear interpolation between order
/// statistics.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}
