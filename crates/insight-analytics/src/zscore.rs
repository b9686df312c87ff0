//! Standard-score outlier detection.

use insight_model::Severity;
use insight_transform::mean_std;

/// One flagged point of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreHit {
    /// Index into the scored values.
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
    pub severity: Severity,
}

/// Severity of a standard score against `threshold`, or None when the point
/// is not flagged.
pub fn classify(z_score: f64, threshold: f64) -> Option<Severity> {
    let magnitude = z_score.abs();
    if magnitude > threshold + 1.0 {
        Some(Severity::High)
    } else if magnitude > threshold {
        Some(Severity::Medium)
    } else {
        None
    }
}

/// Flag values whose population z-score exceeds `threshold` in magnitude.
///
/// A series without spread has no definable outliers and yields nothing.
pub fn score(values: &[f64], threshold: f64) -> Vec<ZScoreHit> {
    let Some((mean, std)) = mean_std(values) else {
        return Vec::new();
    };
    if !std.is_finite() || std == 0.0 {
        return Vec::new();
    }
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let z_score = (value - mean) / std;
            classify(z_score, threshold).map(|severity| ZScoreHit {
                index,
                value: *value,
                z_score,
                severity,
            })
        })
        .collect()
}
