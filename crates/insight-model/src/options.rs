//! Configuration surface for an analysis run.
//!
//! Every option has a default so that a request naming only the table and the
//! target column is complete. Method names are matched leniently: an unknown
//! name falls back to the default method and a warning is logged with both the
//! requested and the effective name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{InsightError, Result};

/// Default z-score threshold.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;
/// Default forecast horizon.
pub const DEFAULT_FORECAST_PERIODS: usize = 3;
/// Default upstream row limit.
pub const DEFAULT_ROW_LIMIT: usize = 10_000;
/// Seed shared by every sampling path.
pub const DEFAULT_SEED: u64 = 42;

/// Anomaly detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyMethod {
    /// Standard score against the series mean.
    #[default]
    Zscore,
    /// Random isolation trees over the numeric feature matrix.
    IsolationForest,
}

impl AnomalyMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyMethod::Zscore => "zscore",
            AnomalyMethod::IsolationForest => "isolation_forest",
        }
    }

    /// Resolve a method name, falling back to [`AnomalyMethod::Zscore`].
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = Self::default();
            tracing::warn!(
                requested = %name,
                effective = fallback.as_str(),
                "unknown anomaly method, using default"
            );
            fallback
        })
    }
}

impl FromStr for AnomalyMethod {
    type Err = InsightError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zscore" | "z_score" => Ok(AnomalyMethod::Zscore),
            "isolation_forest" => Ok(AnomalyMethod::IsolationForest),
            other => Err(InsightError::InvalidOption(format!(
                "unknown anomaly method: {other}"
            ))),
        }
    }
}

impl fmt::Display for AnomalyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnomalyMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_or_default(&name))
    }
}

/// Forecasting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Ordinary least squares against row position.
    #[default]
    LinearRegression,
    /// Additive damped-trend exponential smoothing without seasonality.
    HoltWinters,
}

impl ForecastMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::HoltWinters => "holt_winters",
        }
    }

    /// Resolve a method name, falling back to [`ForecastMethod::LinearRegression`].
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = Self::default();
            tracing::warn!(
                requested = %name,
                effective = fallback.as_str(),
                "unknown forecast method, using default"
            );
            fallback
        })
    }
}

impl FromStr for ForecastMethod {
    type Err = InsightError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear_regression" | "linear" => Ok(ForecastMethod::LinearRegression),
            "holt_winters" => Ok(ForecastMethod::HoltWinters),
            other => Err(InsightError::InvalidOption(format!(
                "unknown forecast method: {other}"
            ))),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ForecastMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_or_default(&name))
    }
}

/// Options consumed by the detector and forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Z-score cut-off; points with `|z| > threshold` are flagged.
    pub anomaly_threshold: f64,
    /// Forecast horizon.
    pub forecast_periods: usize,
    pub anomaly_method: AnomalyMethod,
    pub forecast_method: ForecastMethod,
    /// Cap on the working set used for anomaly detection.
    pub max_samples: Option<usize>,
    /// Seed for every sampling path (row sampling and isolation trees).
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            anomaly_method: AnomalyMethod::default(),
            forecast_method: ForecastMethod::default(),
            max_samples: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.anomaly_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_forecast_periods(mut self, periods: usize) -> Self {
        self.forecast_periods = periods;
        self
    }

    #[must_use]
    pub fn with_anomaly_method(mut self, method: AnomalyMethod) -> Self {
        self.anomaly_method = method;
        self
    }

    #[must_use]
    pub fn with_forecast_method(mut self, method: ForecastMethod) -> Self {
        self.forecast_method = method;
        self
    }

    #[must_use]
    pub fn with_max_samples(mut self, max_samples: Option<usize>) -> Self {
        self.max_samples = max_samples;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject option values no stage can honour.
    pub fn validate(&self) -> Result<()> {
        if self.forecast_periods == 0 {
            return Err(InsightError::InvalidOption(
                "forecast_periods must be a positive integer".to_string(),
            ));
        }
        if !self.anomaly_threshold.is_finite() {
            return Err(InsightError::InvalidOption(
                "anomaly_threshold must be a finite number".to_string(),
            ));
        }
        if self.max_samples == Some(0) {
            return Err(InsightError::InvalidOption(
                "max_samples must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

/// A full analysis request: which table and columns, plus options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub table: String,
    pub target_column: String,
    #[serde(default)]
    pub date_column: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Upper bound on fetched rows; also bounds detection when
    /// `max_samples` is unset.
    #[serde(default)]
    pub max_rows: Option<usize>,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(table: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            target_column: target_column.into(),
            date_column: None,
            limit: DEFAULT_ROW_LIMIT,
            max_rows: None,
            options: AnalysisOptions::default(),
        }
    }

    #[must_use]
    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Row limit handed to the row source: `min(limit, max_rows)`.
    pub fn effective_limit(&self) -> usize {
        match self.max_rows {
            Some(max_rows) => self.limit.min(max_rows),
            None => self.limit,
        }
    }

    /// Options with `max_samples` defaulted from `max_rows`.
    pub fn effective_options(&self) -> AnalysisOptions {
        let mut options = self.options.clone();
        if options.max_samples.is_none() {
            options.max_samples = self.max_rows;
        }
        options
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(InsightError::InvalidOption(
                "limit must be a positive integer".to_string(),
            ));
        }
        if self.max_rows == Some(0) {
            return Err(InsightError::InvalidOption(
                "max_rows must be a positive integer".to_string(),
            ));
        }
        self.options.validate()
    }
}
