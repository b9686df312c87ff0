//! End-to-end analysis of one table snapshot.
//!
//! # Stage Order
//!
//! 1. **Validate** - the request and the presence of the target and date columns
//! 2. **Clean** - deduplicate, drop empty columns, type, impute
//! 3. **Normalize** - feature matrix for the detector only
//! 4. **Detect** - anomalies of the cleaned target
//! 5. **Forecast** - future target values in the original scale
//! 6. **Assemble** - historical series and metrics
//!
//! Either a complete [`AnalysisResult`] is produced or an error is returned.

use std::time::Instant;

use insight_analytics::{AnomalyDetector, Forecaster};
use insight_ingest::TableSource;
use insight_model::{AnalysisRequest, AnalysisResult, InsightError, Metrics, Result};
use insight_transform::{clean, normalize};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::historical::historical_series;

/// Fail with the names of requested columns that `raw` does not have.
pub fn validate_columns(raw: &DataFrame, request: &AnalysisRequest) -> Result<()> {
    let missing: Vec<String> = std::iter::once(request.target_column.as_str())
        .chain(request.date_column.as_deref())
        .filter(|name| raw.column(name).is_err())
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(InsightError::MissingColumns { columns: missing })
    }
}

/// Run every stage on an already fetched table.
///
/// The row limit is the row source's concern and is not applied here.
pub fn run(raw: &DataFrame, request: &AnalysisRequest) -> Result<AnalysisResult> {
    let span = info_span!(
        "analysis",
        table = %request.table,
        column = %request.target_column,
        rows = raw.height()
    );
    let _guard = span.enter();
    let start = Instant::now();

    request.validate()?;
    validate_columns(raw, request)?;

    let options = request.effective_options();
    let target = request.target_column.as_str();
    let date_column = request.date_column.as_deref();

    let (cleaned, mut steps) = clean(raw)?;
    let (normalized, normalize_steps) = normalize(&cleaned)?;
    steps.extend(normalize_steps);
    debug!(steps = %steps, "transformations applied");

    let anomalies = AnomalyDetector::from_options(&options).detect(
        &cleaned,
        target,
        date_column,
        Some(&normalized),
    );
    let forecast = Forecaster::from_options(&options).forecast(&cleaned, target, date_column);
    let historical = historical_series(&cleaned, target, date_column);

    let metrics = Metrics {
        rows: cleaned.height(),
        dropped_rows: raw.height().saturating_sub(cleaned.height()),
        anomaly_count: anomalies.len(),
        forecast_horizon: forecast.len(),
        anomaly_method: options.anomaly_method,
        forecast_method: options.forecast_method,
        target_column: request.target_column.clone(),
    };
    info!(
        rows = metrics.rows,
        anomalies = metrics.anomaly_count,
        horizon = metrics.forecast_horizon,
        duration_ms = start.elapsed().as_millis(),
        "analysis complete"
    );

    Ok(AnalysisResult {
        anomalies,
        forecast,
        historical,
        metrics,
        pipeline_steps: steps.into_vec(),
    })
}

/// Fetch the requested table with the effective row limit, then run.
pub fn run_from_source(source: &impl TableSource, request: &AnalysisRequest) -> Result<AnalysisResult> {
    request.validate()?;
    let limit = request.effective_limit();
    debug!(table = %request.table, limit, "fetching table");
    let raw = source.fetch(&request.table, limit)?;
    run(&raw, request)
}

/// Analysis runner bound to one row source.
#[derive(Debug, Clone)]
pub struct PipelineRunner<S> {
    source: S,
}

impl<S: TableSource> PipelineRunner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        run_from_source(&self.source, request)
    }
}
