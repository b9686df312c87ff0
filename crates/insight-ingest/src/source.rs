//! The row-source contract consumed by the pipeline runner.

use std::collections::BTreeMap;

use insight_model::{InsightError, Result};
use polars::prelude::DataFrame;

use crate::polars_utils::column_names;

/// A table a source can serve, with its column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<String>,
}

/// Supplies raw tables to the pipeline.
///
/// Implementations must honour `limit`: the returned frame never has more
/// than `limit` rows.
pub trait TableSource {
    /// Tables available from this source, sorted by name.
    fn list_tables(&self) -> Result<Vec<TableInfo>>;

    /// Fetch at most `limit` rows of `table`.
    fn fetch(&self, table: &str, limit: usize) -> Result<DataFrame>;
}

/// Named frames held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<String, DataFrame>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, frame: DataFrame) -> Self {
        self.insert(name, frame);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, frame: DataFrame) {
        self.tables.insert(name.into(), frame);
    }
}

impl TableSource for MemorySource {
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        Ok(self
            .tables
            .iter()
            .map(|(name, frame)| TableInfo {
                name: name.clone(),
                columns: column_names(frame),
            })
            .collect())
    }

    fn fetch(&self, table: &str, limit: usize) -> Result<DataFrame> {
        let frame = self
            .tables
            .get(table)
            .ok_or_else(|| InsightError::source_failure(table, "table not found"))?;
        Ok(frame.slice(0, limit))
    }
}
