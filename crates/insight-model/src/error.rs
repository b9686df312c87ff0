use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    /// Required columns are absent from the raw table.
    #[error("missing columns in dataset: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("unable to fetch table {table}: {message}")]
    Source { table: String, message: String },
    #[error("frame error: {0}")]
    Frame(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InsightError {
    pub fn source_failure(table: impl Into<String>, message: impl ToString) -> Self {
        Self::Source {
            table: table.into(),
            message: message.to_string(),
        }
    }

    pub fn frame(message: impl ToString) -> Self {
        Self::Frame(message.to_string())
    }

    /// True for failures caused by the request rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingColumns { .. } | Self::InvalidOption(_))
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
