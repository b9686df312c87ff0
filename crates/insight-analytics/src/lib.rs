//! Anomaly detection and forecasting stages.
//!
//! Both stages read the cleaned table and never fail: a missing or
//! non-numeric target, or a degenerate series, produces an empty result.

pub mod detector;
pub mod forecaster;
pub mod frequency;
pub mod isolation_forest;
pub mod sampling;
pub mod series;
pub mod zscore;

pub use detector::{AnomalyDetector, FeatureMatrix, row_timestamp};
pub use forecaster::{DampedTrend, Forecaster, future_labels, linear_fit, linear_predictions};
pub use frequency::{Cadence, MonthAnchor, future_timestamps, infer_cadence};
pub use isolation_forest::{IsolationForest, percentile};
pub use sampling::sample_indices;
pub use series::TargetSeries;
