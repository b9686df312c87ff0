//! Directory of CSV files served as tables.
//!
//! Each `*.csv` file is one table named by its file stem. Column types are
//! inferred by the polars CSV reader; anything it leaves as text is typed
//! later by the cleaner.

use std::path::PathBuf;

use insight_model::{InsightError, Result};
use polars::prelude::*;
use tracing::debug;

use crate::discovery::{list_csv_files, read_csv_headers, table_name};
use crate::source::{TableInfo, TableSource};

/// Rows scanned by the CSV reader when inferring column types.
const SCHEMA_INFERENCE_ROWS: usize = 1000;

#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(InsightError::source_failure(
                root.display().to_string(),
                "directory not found",
            ));
        }
        Ok(Self { root })
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        list_csv_files(&self.root)?
            .into_iter()
            .find(|path| table_name(path).as_deref() == Some(table))
            .ok_or_else(|| InsightError::source_failure(table, "table not found"))
    }
}

impl TableSource for CsvDirectorySource {
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        let mut tables = Vec::new();
        for path in list_csv_files(&self.root)? {
            let Some(name) = table_name(&path) else {
                continue;
            };
            let columns = read_csv_headers(&path)?;
            tables.push(TableInfo { name, columns });
        }
        Ok(tables)
    }

    fn fetch(&self, table: &str, limit: usize) -> Result<DataFrame> {
        let path = self.table_path(table)?;
        debug!(table, path = %path.display(), limit, "reading csv table");
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_n_rows(Some(limit))
            .with_infer_schema_length(Some(SCHEMA_INFERENCE_ROWS))
            .try_into_reader_with_file_path(Some(path))
            .map_err(|error| InsightError::source_failure(table, error))?
            .finish()
            .map_err(|error| InsightError::source_failure(table, error))?;
        Ok(frame)
    }
}
