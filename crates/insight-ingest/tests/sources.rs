//! Tests for CSV-directory and in-memory row sources.

use std::fs;

use insight_ingest::{
    CsvDirectorySource, MemorySource, TableSource, column_f64_values, list_csv_files,
};
use insight_model::InsightError;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

fn write_sales(dir: &std::path::Path) {
    fs::write(
        dir.join("sales.csv"),
        "date,revenue,region\n\
         2024-01-01,100,north\n\
         2024-01-02,105,south\n\
         2024-01-03,110,north\n\
         2024-01-04,400,south\n",
    )
    .expect("write sales");
}

#[test]
fn lists_csv_tables_with_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sales(dir.path());
    fs::write(dir.path().join("costs.CSV"), "month,amount\n1,2\n").expect("write costs");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

    let source = CsvDirectorySource::new(dir.path()).expect("source");
    let tables = source.list_tables().expect("list tables");

    let names: Vec<&str> = tables.iter().map(|table| table.name.as_str()).collect();
    assert_eq!(names, ["costs", "sales"]);
    assert_eq!(tables[1].columns, ["date", "revenue", "region"]);
    assert_eq!(list_csv_files(dir.path()).expect("list files").len(), 2);
}

#[test]
fn fetch_respects_row_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sales(dir.path());
    let source = CsvDirectorySource::new(dir.path()).expect("source");

    let frame = source.fetch("sales", 2).expect("fetch");
    assert_eq!(frame.height(), 2);
    let revenue = column_f64_values(&frame, "revenue").expect("revenue column");
    assert_eq!(revenue, vec![Some(100.0), Some(105.0)]);

    let all = source.fetch("sales", 10_000).expect("fetch all");
    assert_eq!(all.height(), 4);
}

#[test]
fn unknown_table_is_a_source_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = CsvDirectorySource::new(dir.path()).expect("source");
    let error = source.fetch("missing", 10).expect_err("missing table");
    assert!(matches!(error, InsightError::Source { .. }));
}

#[test]
fn missing_directory_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(CsvDirectorySource::new(missing).is_err());
}

#[test]
fn memory_source_slices_to_limit() {
    let columns: Vec<Column> =
        vec![Series::new("value".into(), vec![1.0, 2.0, 3.0]).into_column()];
    let frame = DataFrame::new(columns).expect("frame");
    let source = MemorySource::new().with_table("metrics", frame);

    let tables = source.list_tables().expect("list tables");
    assert_eq!(tables[0].name, "metrics");
    assert_eq!(tables[0].columns, ["value"]);
    assert_eq!(source.fetch("metrics", 2).expect("fetch").height(), 2);
    assert!(source.fetch("other", 2).is_err());
}
