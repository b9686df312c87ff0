//! Column kind classification.

use polars::prelude::{Column, DataFrame, DataType};

/// Scalar kind of a column after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Datetime,
    /// Text columns, plus anything else that is neither numeric nor temporal.
    Categorical,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => ColumnKind::Numeric,
            DataType::Datetime(_, _) | DataType::Date => ColumnKind::Datetime,
            _ => ColumnKind::Categorical,
        }
    }

    pub fn of_column(column: &Column) -> Self {
        Self::of(column.dtype())
    }
}

/// Names of the columns of `kind`, in frame order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| ColumnKind::of_column(column) == kind)
        .map(|column| column.name().to_string())
        .collect()
}

/// True when the column holds text values.
pub fn is_string_column(column: &Column) -> bool {
    matches!(column.dtype(), DataType::String)
}
