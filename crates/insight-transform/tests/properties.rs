//! Property tests for the cleaning and normalization stages.

use insight_ingest::column_f64_values;
use insight_transform::{clean, normalize};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

type Row = (
    i64,
    Option<i32>,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
    Option<bool>,
);

fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (
            0i64..3,
            prop::option::of(0i32..4),
            prop::option::of(prop::sample::select(vec!["A", "B", "C", "", "  "])),
            prop::option::of(prop::sample::select(vec!["1", "2.5", " 3 ", "", "1.0"])),
            prop::option::of(prop::sample::select(vec![
                "2024-01-01",
                "2024-01-02",
                "2024-01-03 12:30:00",
                "",
            ])),
            prop::option::of(any::<bool>()),
        ),
        0..16,
    )
}

fn table(rows: &[Row]) -> DataFrame {
    let ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|row| row.1.map(f64::from)).collect();
    let categories: Vec<Option<&str>> = rows.iter().map(|row| row.2).collect();
    let amounts: Vec<Option<&str>> = rows.iter().map(|row| row.3).collect();
    let dates: Vec<Option<&str>> = rows.iter().map(|row| row.4).collect();
    let flags: Vec<Option<bool>> = rows.iter().map(|row| row.5).collect();
    DataFrame::new(vec![
        Series::new("id".into(), ids).into_column(),
        Series::new("value".into(), values).into_column(),
        Series::new("category".into(), categories).into_column(),
        Series::new("amount".into(), amounts).into_column(),
        Series::new("date".into(), dates).into_column(),
        Series::new("flag".into(), flags).into_column(),
    ])
    .expect("frame")
}

proptest! {
    #[test]
    fn clean_is_idempotent(rows in arb_rows()) {
        let (once, _) = clean(&table(&rows)).expect("first clean");
        let (twice, _) = clean(&once).expect("second clean");
        prop_assert!(once.equals_missing(&twice));
    }

    #[test]
    fn normalize_preserves_row_count(rows in arb_rows()) {
        let (cleaned, _) = clean(&table(&rows)).expect("clean");
        let (normalized, _) = normalize(&cleaned).expect("normalize");
        prop_assert_eq!(normalized.height(), cleaned.height());
    }

    #[test]
    fn zero_variance_column_becomes_zero(value in -1.0e6f64..1.0e6, len in 1usize..20) {
        let df = DataFrame::new(vec![
            Series::new("constant".into(), vec![value; len]).into_column(),
        ])
        .expect("frame");
        let (normalized, _) = normalize(&df).expect("normalize");
        let values = column_f64_values(&normalized, "constant").expect("constant");
        prop_assert_eq!(values, vec![Some(0.0); len]);
    }
}
