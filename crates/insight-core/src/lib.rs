//! Analysis pipeline orchestration.

pub mod historical;
pub mod pipeline;

pub use historical::historical_series;
pub use pipeline::{PipelineRunner, run, run_from_source, validate_columns};
