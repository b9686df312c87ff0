//! Tests for the anomaly detection stage.

use insight_analytics::AnomalyDetector;
use insight_model::{AnalysisOptions, AnomalyMethod, Severity};
use insight_transform::{clean, normalize};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

const REVENUE: [f64; 6] = [100.0, 105.0, 110.0, 400.0, 115.0, 120.0];

fn revenue_frame() -> DataFrame {
    let dates: Vec<String> = (1..=6).map(|day| format!("2024-01-0{day}")).collect();
    let raw = DataFrame::new(vec![
        Series::new("date".into(), dates).into_column(),
        Series::new("revenue".into(), REVENUE.to_vec()).into_column(),
    ])
    .expect("frame");
    clean(&raw).expect("clean").0
}

fn zscore_detector(threshold: f64) -> AnomalyDetector {
    AnomalyDetector::from_options(&AnalysisOptions::default().with_threshold(threshold))
}

#[test]
fn zscore_flags_revenue_spike() {
    let cleaned = revenue_frame();
    let records = zscore_detector(2.0).detect(&cleaned, "revenue", Some("date"), None);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.timestamp, "2024-01-04T00:00:00");
    assert_eq!(record.metric, "revenue");
    assert_eq!(record.value, Some(400.0));
    assert!(record.z_score.is_some_and(|z| z > 2.0));
    assert!(record.score.is_none());
    assert!(matches!(record.severity, Severity::Medium | Severity::High));
}

#[test]
fn timestamp_falls_back_to_position() {
    let cleaned = revenue_frame();
    let records = zscore_detector(2.0).detect(&cleaned, "revenue", None, None);
    assert_eq!(records[0].timestamp, "3");

    let records = zscore_detector(2.0).detect(&cleaned, "revenue", Some("missing"), None);
    assert_eq!(records[0].timestamp, "3");
}

#[test]
fn absent_or_non_numeric_target_yields_nothing() {
    let cleaned = revenue_frame();
    let detector = zscore_detector(0.1);
    assert!(detector.detect(&cleaned, "profit", None, None).is_empty());

    let text = DataFrame::new(vec![
        Series::new("region".into(), vec!["north", "south", "west"]).into_column(),
    ])
    .expect("frame");
    assert!(detector.detect(&text, "region", None, None).is_empty());
}

#[test]
fn constant_series_has_no_zscore_anomalies() {
    let df = DataFrame::new(vec![Series::new("v".into(), vec![7.0; 5]).into_column()])
        .expect("frame");
    assert!(zscore_detector(0.0).detect(&df, "v", None, None).is_empty());
}

#[test]
fn isolation_forest_scores_spike_from_features() {
    let cleaned = revenue_frame();
    let (normalized, _) = normalize(&cleaned).expect("normalize");
    let detector = AnomalyDetector::from_options(
        &AnalysisOptions::default().with_anomaly_method(AnomalyMethod::IsolationForest),
    );

    let records = detector.detect(&cleaned, "revenue", Some("date"), Some(&normalized));

    assert!(!records.is_empty());
    let spike = records
        .iter()
        .find(|record| record.timestamp == "2024-01-04T00:00:00")
        .expect("spike flagged");
    assert_eq!(spike.value, Some(400.0));
    assert!(spike.score.is_some_and(|score| score <= 0.0));
    assert!(spike.z_score.is_none());
}

#[test]
fn isolation_forest_without_features_uses_cleaned_columns() {
    let cleaned = revenue_frame();
    let detector = AnomalyDetector::from_options(
        &AnalysisOptions::default().with_anomaly_method(AnomalyMethod::IsolationForest),
    );

    let first = detector.detect(&cleaned, "revenue", None, None);
    let second = detector.detect(&cleaned, "revenue", None, None);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn max_samples_bounds_the_working_set() {
    let values: Vec<f64> = (0..200i32).map(|i| f64::from(i % 7)).chain([500.0]).collect();
    let df = DataFrame::new(vec![Series::new("v".into(), values).into_column()])
        .expect("frame");
    let options = AnalysisOptions::default()
        .with_anomaly_method(AnomalyMethod::IsolationForest)
        .with_max_samples(Some(50));
    let detector = AnomalyDetector::from_options(&options);

    let first = detector.detect(&df, "v", None, None);
    let second = detector.detect(&df, "v", None, None);

    assert_eq!(first, second);
    assert!(first.len() <= 50);
}

#[test]
fn isolation_forest_handles_values_near_f64_limits() {
    let df = DataFrame::new(vec![
        Series::new("v".into(), vec![-1e308, 0.0, 1e308, 5.0]).into_column(),
    ])
    .expect("frame");
    let detector = AnomalyDetector::from_options(
        &AnalysisOptions::default().with_anomaly_method(AnomalyMethod::IsolationForest),
    );

    let records = detector.detect(&df, "v", None, None);

    assert!(!records.is_empty());
    assert!(
        records
            .iter()
            .all(|record| record.score.is_some_and(f64::is_finite))
    );
}
