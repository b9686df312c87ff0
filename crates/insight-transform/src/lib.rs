//! Cleaning and normalization stages.
//!
//! Both stages take a frame by reference and return a fresh frame together
//! with the [`StepLog`] of what they changed.

pub mod cleaner;
pub mod datetime;
mod frame_utils;
pub mod kind;
pub mod normalizer;
pub mod steps;

pub use cleaner::{clean, median, mode};
pub use datetime::{
    any_to_datetime, column_datetime_values, date_label, format_timestamp, parse_datetime,
};
pub use kind::{ColumnKind, columns_of_kind};
pub use normalizer::{mean_std, normalize, standardize};
pub use steps::StepLog;
