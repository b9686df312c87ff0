//! Tests for the forecasting stage.

use insight_analytics::Forecaster;
use insight_model::ForecastMethod;
use insight_transform::clean;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

fn frame(dates: &[&str], values: &[f64]) -> DataFrame {
    let raw = DataFrame::new(vec![
        Series::new("date".into(), dates.to_vec()).into_column(),
        Series::new("revenue".into(), values.to_vec()).into_column(),
    ])
    .expect("frame");
    clean(&raw).expect("clean").0
}

fn revenue_frame() -> DataFrame {
    frame(
        &[
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-04",
            "2024-01-05",
            "2024-01-06",
        ],
        &[100.0, 105.0, 110.0, 400.0, 115.0, 120.0],
    )
}

#[test]
fn linear_regression_continues_daily_dates() {
    let forecast = Forecaster::new(ForecastMethod::LinearRegression, 2).forecast(
        &revenue_frame(),
        "revenue",
        Some("date"),
    );

    let dates: Vec<&str> = forecast.iter().map(|point| point.date.as_str()).collect();
    assert_eq!(dates, ["2024-01-07T00:00:00", "2024-01-08T00:00:00"]);
    assert!(forecast.iter().all(|point| point.prediction.is_finite()));
}

#[test]
fn holt_winters_returns_requested_horizon() {
    let forecast = Forecaster::new(ForecastMethod::HoltWinters, 2).forecast(
        &revenue_frame(),
        "revenue",
        Some("date"),
    );

    assert_eq!(forecast.len(), 2);
    assert!(forecast[0].date < forecast[1].date);
    assert!(forecast[0].date.as_str() > "2024-01-06T00:00:00");
}

#[test]
fn labels_are_sequence_numbers_without_dates() {
    let forecast = Forecaster::new(ForecastMethod::LinearRegression, 3).forecast(
        &revenue_frame(),
        "revenue",
        None,
    );

    let labels: Vec<&str> = forecast.iter().map(|point| point.date.as_str()).collect();
    assert_eq!(labels, ["6", "7", "8"]);
}

#[test]
fn monthly_dates_continue_monthly() {
    let df = frame(&["2024-01-01", "2024-02-01", "2024-03-01"], &[1.0, 2.0, 3.0]);
    let forecast =
        Forecaster::new(ForecastMethod::LinearRegression, 2).forecast(&df, "revenue", Some("date"));

    assert_eq!(forecast[0].date, "2024-04-01T00:00:00");
    assert_eq!(forecast[1].date, "2024-05-01T00:00:00");
    assert!((forecast[0].prediction - 4.0).abs() < 1e-9);
}

#[test]
fn short_series_falls_back() {
    let df = frame(&["2024-01-01", "2024-01-02"], &[10.0, 14.0]);
    let holt = Forecaster::new(ForecastMethod::HoltWinters, 2).forecast(&df, "revenue", Some("date"));
    let linear =
        Forecaster::new(ForecastMethod::LinearRegression, 2).forecast(&df, "revenue", Some("date"));
    assert_eq!(holt, linear);

    let single = frame(&["2024-01-01"], &[10.0]);
    let forecast =
        Forecaster::new(ForecastMethod::LinearRegression, 2).forecast(&single, "revenue", None);
    let predictions: Vec<f64> = forecast.iter().map(|point| point.prediction).collect();
    assert_eq!(predictions, [10.0, 10.0]);
}

#[test]
fn missing_target_yields_nothing() {
    let forecast = Forecaster::new(ForecastMethod::LinearRegression, 2).forecast(
        &revenue_frame(),
        "profit",
        Some("date"),
    );
    assert!(forecast.is_empty());
}
