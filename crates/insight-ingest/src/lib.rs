//! Row sources for the analysis pipeline.
//!
//! The pipeline only needs `fetch(table, limit)`; discovery is offered so a
//! caller can present available tables and columns before requesting one.

pub mod csv_source;
pub mod discovery;
pub mod polars_utils;
pub mod source;

pub use csv_source::CsvDirectorySource;
pub use discovery::{list_csv_files, read_csv_headers, table_name};
pub use polars_utils::{
    any_to_f64, any_to_string, any_to_string_non_empty, column_f64_values, column_names,
    column_string_values, format_numeric, parse_f64,
};
pub use source::{MemorySource, TableInfo, TableSource};
