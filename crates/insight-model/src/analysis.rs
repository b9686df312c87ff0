use serde::{Deserialize, Serialize};

use crate::options::{AnomalyMethod, ForecastMethod};

/// Coarse anomaly magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A flagged observation.
///
/// Exactly one of `z_score` and `score` is populated, depending on the
/// detection method that produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub timestamp: String,
    pub metric: String,
    pub severity: Severity,
    pub value: Option<f64>,
    pub z_score: Option<f64>,
    pub score: Option<f64>,
}

impl AnomalyRecord {
    pub fn from_z_score(
        timestamp: String,
        metric: impl Into<String>,
        severity: Severity,
        value: f64,
        z_score: f64,
    ) -> Self {
        Self {
            timestamp,
            metric: metric.into(),
            severity,
            value: Some(value),
            z_score: Some(z_score),
            score: None,
        }
    }

    pub fn from_score(
        timestamp: String,
        metric: impl Into<String>,
        severity: Severity,
        value: Option<f64>,
        score: f64,
    ) -> Self {
        Self {
            timestamp,
            metric: metric.into(),
            severity,
            value,
            z_score: None,
            score: Some(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub prediction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub value: f64,
}

/// Summary counts for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Rows in the cleaned table.
    pub rows: usize,
    /// Raw rows removed by cleaning.
    pub dropped_rows: usize,
    pub anomaly_count: usize,
    pub forecast_horizon: usize,
    pub anomaly_method: AnomalyMethod,
    pub forecast_method: ForecastMethod,
    pub target_column: String,
}

/// Output of one pipeline invocation.
///
/// Serializes directly as the response envelope:
/// `{anomalies, forecast, historical, metrics, pipeline_steps}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub anomalies: Vec<AnomalyRecord>,
    pub forecast: Vec<ForecastPoint>,
    pub historical: Vec<HistoricalPoint>,
    pub metrics: Metrics,
    pub pipeline_steps: Vec<String>,
}

impl AnalysisResult {
    pub fn high_severity_count(&self) -> usize {
        self.anomalies
            .iter()
            .filter(|record| record.severity == Severity::High)
            .count()
    }
}
