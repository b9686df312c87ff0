//! Property tests for detection and forecasting.

use chrono::{Duration, NaiveDate};
use insight_analytics::{Forecaster, future_timestamps, zscore};
use insight_model::{ForecastMethod, Severity};
use insight_transform::mean_std;
use proptest::prelude::*;

proptest! {
    #[test]
    fn zscore_flags_iff_above_threshold(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 2..40),
        threshold in 0.0f64..3.0,
    ) {
        let hits = zscore::score(&values, threshold);
        let (mean, std) = mean_std(&values).expect("non-empty");
        if std == 0.0 {
            prop_assert!(hits.is_empty());
        } else {
            let expected: Vec<usize> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| ((*v - mean) / std).abs() > threshold)
                .map(|(idx, _)| idx)
                .collect();
            let flagged: Vec<usize> = hits.iter().map(|hit| hit.index).collect();
            prop_assert_eq!(flagged, expected);
            for hit in &hits {
                let high = hit.z_score.abs() > threshold + 1.0;
                prop_assert_eq!(hit.severity == Severity::High, high);
            }
        }
    }

    #[test]
    fn forecast_length_matches_horizon(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 3..30),
        horizon in 1usize..10,
        holt in any::<bool>(),
    ) {
        let method = if holt { ForecastMethod::HoltWinters } else { ForecastMethod::LinearRegression };
        let predictions = Forecaster::new(method, horizon).predict(&values);
        prop_assert_eq!(predictions.len(), horizon);
    }

    #[test]
    fn future_dates_increase_after_last(
        offsets in prop::collection::vec(0i64..400, 1..20),
        horizon in 1usize..8,
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_hms_opt(0, 0, 0)
            .expect("time");
        let observed: Vec<_> = offsets.iter().map(|days| start + Duration::days(*days)).collect();
        let last = observed.iter().max().copied().expect("non-empty");

        let future = future_timestamps(&observed, horizon);

        prop_assert_eq!(future.len(), horizon);
        prop_assert!(future[0] > last);
        prop_assert!(future.windows(2).all(|w| w[0] < w[1]));
    }
}
