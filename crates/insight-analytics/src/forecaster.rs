//! Short-horizon forecasting of a target column.
//!
//! Predictions are always in the original scale of the cleaned target column.
//! Future labels come from the date column when one parses, else from row
//! sequence numbers.

use insight_model::{AnalysisOptions, ForecastMethod, ForecastPoint};
use insight_transform::{column_datetime_values, format_timestamp};
use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use crate::frequency::future_timestamps;
use crate::series::TargetSeries;

/// Minimum points for the damped trend model; shorter series use the linear
/// model instead.
pub const MIN_TREND_POINTS: usize = 3;

/// Intercept and slope of an ordinary least squares fit of `values` against
/// their 0-based position. None with fewer than two points.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;
    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });
    let slope = sxy / sxx;
    Some((y_mean - slope * x_mean, slope))
}

/// Linear trend predictions at positions `n..n + horizon`.
///
/// Fewer than two points yield `horizon` copies of the series mean.
pub fn linear_predictions(values: &[f64], horizon: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len();
    match linear_fit(values) {
        Some((intercept, slope)) => (n..n + horizon)
            .map(|x| intercept + slope * x as f64)
            .collect(),
        None => {
            let mean = values.iter().sum::<f64>() / n as f64;
            vec![mean; horizon]
        }
    }
}

/// Additive damped-trend exponential smoothing without seasonality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedTrend {
    pub alpha: f64,
    pub beta: f64,
    pub phi: f64,
    pub level: f64,
    pub trend: f64,
}

impl DampedTrend {
    /// Smoothing grid; `beta` never exceeds `alpha`.
    const SMOOTHING_GRID: [f64; 19] = [
        0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60, 0.65, 0.70, 0.75,
        0.80, 0.85, 0.90, 0.95,
    ];
    const DAMPING_GRID: [f64; 10] = [0.80, 0.82, 0.84, 0.86, 0.88, 0.90, 0.92, 0.94, 0.96, 0.98];

    /// Fit by grid search on in-sample one-step squared error. None with fewer
    /// than [`MIN_TREND_POINTS`] points.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_TREND_POINTS {
            return None;
        }
        let mut best: Option<(f64, Self)> = None;
        for &alpha in &Self::SMOOTHING_GRID {
            for &beta in Self::SMOOTHING_GRID.iter().take_while(|beta| **beta <= alpha) {
                for &phi in &Self::DAMPING_GRID {
                    let (sse, model) = Self::smooth(values, alpha, beta, phi);
                    if sse.is_finite() && best.is_none_or(|(best_sse, _)| sse < best_sse) {
                        best = Some((sse, model));
                    }
                }
            }
        }
        best.map(|(_, model)| model)
    }

    fn smooth(values: &[f64], alpha: f64, beta: f64, phi: f64) -> (f64, Self) {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut sse = 0.0;
        for &y in &values[1..] {
            let expected = level + phi * trend;
            sse += (y - expected).powi(2);
            let next_level = alpha * y + (1.0 - alpha) * expected;
            trend = beta * (next_level - level) + (1.0 - beta) * phi * trend;
            level = next_level;
        }
        let model = Self {
            alpha,
            beta,
            phi,
            level,
            trend,
        };
        (sse, model)
    }

    /// `level + (phi + ... + phi^h) * trend` for `h` in `1..=horizon`.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut damping = 0.0;
        let mut power = 1.0;
        (0..horizon)
            .map(|_| {
                power *= self.phi;
                damping += power;
                self.level + damping * self.trend
            })
            .collect()
    }
}

/// Labels for `horizon` future points after a series of `n` points.
///
/// Uses the date column when at least one of its values parses, else the
/// sequence numbers `n, n+1, ...`.
pub fn future_labels(
    cleaned: &DataFrame,
    date_column: Option<&str>,
    n: usize,
    horizon: usize,
) -> Vec<String> {
    let observed: Vec<_> = date_column
        .and_then(|name| column_datetime_values(cleaned, name))
        .map(|values| values.into_iter().flatten().collect())
        .unwrap_or_default();
    if observed.is_empty() {
        return (n..n + horizon).map(|pos| pos.to_string()).collect();
    }
    future_timestamps(&observed, horizon)
        .into_iter()
        .map(format_timestamp)
        .collect()
}

/// Forecasting stage, dispatched on [`ForecastMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forecaster {
    pub method: ForecastMethod,
    pub horizon: usize,
}

impl Forecaster {
    pub fn new(method: ForecastMethod, horizon: usize) -> Self {
        Self { method, horizon }
    }

    pub fn from_options(options: &AnalysisOptions) -> Self {
        Self::new(options.forecast_method, options.forecast_periods)
    }

    /// Predicted values only, for a prepared series.
    pub fn predict(&self, values: &[f64]) -> Vec<f64> {
        match self.method {
            ForecastMethod::LinearRegression => linear_predictions(values, self.horizon),
            ForecastMethod::HoltWinters => match DampedTrend::fit(values) {
                Some(model) => {
                    debug!(
                        alpha = model.alpha,
                        beta = model.beta,
                        phi = model.phi,
                        "damped trend fitted"
                    );
                    model.forecast(self.horizon)
                }
                None => {
                    debug!(points = values.len(), "too few points for trend model, using linear");
                    linear_predictions(values, self.horizon)
                }
            },
        }
    }

    /// Forecast `target` of the cleaned table. Empty when the target is absent
    /// or has no numeric value. Fewer than `horizon` points are returned when
    /// future dates would leave the representable calendar range.
    pub fn forecast(
        &self,
        cleaned: &DataFrame,
        target: &str,
        date_column: Option<&str>,
    ) -> Vec<ForecastPoint> {
        let span = info_span!("forecast", method = %self.method, horizon = self.horizon);
        let _guard = span.enter();

        let Some(series) = TargetSeries::from_column(cleaned, target) else {
            debug!(column = target, "target column absent");
            return Vec::new();
        };
        if series.is_empty() {
            debug!(column = target, "no numeric values to forecast");
            return Vec::new();
        }

        let predictions = self.predict(&series.values);
        let labels = future_labels(cleaned, date_column, series.len(), predictions.len());
        if labels.len() < predictions.len() {
            debug!(
                requested = predictions.len(),
                labelled = labels.len(),
                "future dates exhausted, forecast truncated"
            );
        }
        labels
            .into_iter()
            .zip(predictions)
            .map(|(date, prediction)| ForecastPoint { date, prediction })
            .collect()
    }
}
