//! Data model shared by the analysis pipeline crates.

pub mod analysis;
pub mod error;
pub mod options;

pub use analysis::{
    AnalysisResult, AnomalyRecord, ForecastPoint, HistoricalPoint, Metrics, Severity,
};
pub use error::{InsightError, Result};
pub use options::{
    AnalysisOptions, AnalysisRequest, AnomalyMethod, DEFAULT_ANOMALY_THRESHOLD,
    DEFAULT_FORECAST_PERIODS, DEFAULT_ROW_LIMIT, DEFAULT_SEED, ForecastMethod,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            anomalies: vec![AnomalyRecord::from_z_score(
                "2024-01-04T00:00:00".to_string(),
                "revenue",
                Severity::High,
                400.0,
                2.5,
            )],
            forecast: vec![ForecastPoint {
                date: "2024-01-07T00:00:00".to_string(),
                prediction: 125.0,
            }],
            historical: vec![HistoricalPoint {
                date: "2024-01-01T00:00:00".to_string(),
                value: 100.0,
            }],
            metrics: Metrics {
                rows: 6,
                dropped_rows: 0,
                anomaly_count: 1,
                forecast_horizon: 1,
                anomaly_method: AnomalyMethod::Zscore,
                forecast_method: ForecastMethod::LinearRegression,
                target_column: "revenue".to_string(),
            },
            pipeline_steps: vec!["drop_duplicates".to_string()],
        }
    }

    #[test]
    fn result_serializes_as_envelope() {
        let value = serde_json::to_value(sample_result()).expect("serialize result");
        let object = value.as_object().expect("envelope object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["anomalies", "forecast", "historical", "metrics", "pipeline_steps"]
        );
        assert_eq!(value["anomalies"][0]["severity"], "high");
        assert!(value["anomalies"][0]["score"].is_null());
        assert_eq!(value["metrics"]["anomaly_method"], "zscore");
        assert_eq!(value["metrics"]["forecast_method"], "linear_regression");
    }

    #[test]
    fn anomaly_record_populates_one_score() {
        let record =
            AnomalyRecord::from_score("3".to_string(), "revenue", Severity::Medium, None, -0.2);
        assert!(record.z_score.is_none());
        assert_eq!(record.score, Some(-0.2));
    }

    #[test]
    fn metrics_snapshot() {
        insta::assert_json_snapshot!(sample_result().metrics, @r#"
        {
          "rows": 6,
          "dropped_rows": 0,
          "anomaly_count": 1,
          "forecast_horizon": 1,
          "anomaly_method": "zscore",
          "forecast_method": "linear_regression",
          "target_column": "revenue"
        }
        "#);
    }
}
