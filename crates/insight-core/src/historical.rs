//! Historical series of the cleaned target column.

use insight_analytics::TargetSeries;
use insight_model::HistoricalPoint;
use insight_transform::{column_datetime_values, format_timestamp};
use polars::prelude::DataFrame;

/// Cleaned target values paired with their dates.
///
/// With a date column present in `cleaned`, points are sorted by date
/// ascending (stable for equal dates) and rows whose date does not parse are
/// left out. Otherwise points keep row order and are labelled by position.
pub fn historical_series(
    cleaned: &DataFrame,
    target: &str,
    date_column: Option<&str>,
) -> Vec<HistoricalPoint> {
    let Some(series) = TargetSeries::from_column(cleaned, target) else {
        return Vec::new();
    };
    let dates = date_column.and_then(|name| column_datetime_values(cleaned, name));

    match dates {
        Some(dates) => {
            let mut dated: Vec<_> = series
                .positions
                .iter()
                .zip(&series.values)
                .filter_map(|(position, value)| {
                    dates
                        .get(*position)
                        .copied()
                        .flatten()
                        .map(|date| (date, *value))
                })
                .collect();
            dated.sort_by_key(|(date, _)| *date);
            dated
                .into_iter()
                .map(|(date, value)| HistoricalPoint {
                    date: format_timestamp(date),
                    value,
                })
                .collect()
        }
        None => series
            .positions
            .iter()
            .zip(series.values)
            .map(|(position, value)| HistoricalPoint {
                date: position.to_string(),
                value,
            })
            .collect(),
    }
}
