//! Tests for the normalization stage.

use insight_ingest::{column_f64_values, column_names};
use insight_transform::{ColumnKind, clean, normalize};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

fn sales() -> DataFrame {
    DataFrame::new(vec![
        Series::new("date".into(), vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"])
            .into_column(),
        Series::new("revenue".into(), vec![1.0, 2.0, 3.0, 4.0]).into_column(),
        Series::new("units".into(), vec![5i64, 5, 5, 5]).into_column(),
        Series::new("region".into(), vec!["south", "north", "west", "south"]).into_column(),
    ])
    .expect("frame")
}

#[test]
fn standardizes_and_encodes() {
    let (cleaned, _) = clean(&sales()).expect("clean");
    let (normalized, steps) = normalize(&cleaned).expect("normalize");

    assert_eq!(normalized.height(), 4);
    assert_eq!(
        column_names(&normalized),
        ["date", "revenue", "units", "region_south", "region_west"]
    );
    assert_eq!(
        ColumnKind::of_column(normalized.column("date").expect("date")),
        ColumnKind::Datetime
    );

    let revenue: Vec<f64> = column_f64_values(&normalized, "revenue")
        .expect("revenue")
        .into_iter()
        .flatten()
        .collect();
    let mean = revenue.iter().sum::<f64>() / 4.0;
    assert!(mean.abs() < 1e-12);
    assert!((revenue[3] - 1.341_640_786_499_874).abs() < 1e-9);

    assert_eq!(
        column_f64_values(&normalized, "units").expect("units"),
        vec![Some(0.0); 4]
    );
    assert_eq!(
        column_f64_values(&normalized, "region_south").expect("south"),
        vec![Some(1.0), Some(0.0), Some(0.0), Some(1.0)]
    );
    insta::assert_snapshot!(steps.to_string(), @"standardize:revenue,units -> one_hot_encode:region");
}

#[test]
fn null_category_yields_zero_indicators() {
    let df = DataFrame::new(vec![
        Series::new("kind".into(), vec![Some("a"), None, Some("b")]).into_column(),
    ])
    .expect("frame");

    let (normalized, _) = normalize(&df).expect("normalize");

    assert_eq!(
        column_f64_values(&normalized, "kind_b").expect("kind_b"),
        vec![Some(0.0), Some(0.0), Some(1.0)]
    );
}

#[test]
fn indicator_name_collision_gets_suffix() {
    let df = DataFrame::new(vec![
        Series::new("kind_b".into(), vec![1.0, 2.0]).into_column(),
        Series::new("kind".into(), vec!["a", "b"]).into_column(),
    ])
    .expect("frame");

    let (normalized, _) = normalize(&df).expect("normalize");

    assert_eq!(column_names(&normalized), ["kind_b", "kind_b_1"]);
}

#[test]
fn single_level_category_keeps_row_count() {
    let df = DataFrame::new(vec![
        Series::new("kind".into(), vec!["a", "a", "a"]).into_column(),
    ])
    .expect("frame");

    let (normalized, steps) = normalize(&df).expect("normalize");

    assert_eq!(normalized.height(), 3);
    assert_eq!(normalized.width(), 0);
    assert!(steps.contains("one_hot_encode:kind"));
}
