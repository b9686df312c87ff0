use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info_span};

use insight_core::PipelineRunner;
use insight_ingest::{CsvDirectorySource, TableInfo, TableSource};
use insight_model::{
    AnalysisRequest, AnalysisResult, AnomalyMethod, ForecastMethod, InsightError,
};

use crate::cli::AnalyzeArgs;

/// Exit code for a validation failure (bad request or missing columns).
pub const EXIT_VALIDATION: i32 = 2;
/// Exit code for any other failure.
pub const EXIT_FAILURE: i32 = 1;

pub fn run_tables(data_dir: &Path) -> Result<Vec<TableInfo>> {
    let source = CsvDirectorySource::new(data_dir)
        .with_context(|| format!("open data directory {}", data_dir.display()))?;
    source.list_tables().context("list tables")
}

/// Assemble the request from `--request` (if any) and the explicit flags.
pub fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest> {
    let mut request = match &args.request {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read request file {}", path.display()))?;
            serde_json::from_str::<AnalysisRequest>(&text)
                .with_context(|| format!("parse request file {}", path.display()))?
        }
        None => {
            let (Some(table), Some(target)) = (&args.table, &args.target) else {
                return Err(InsightError::InvalidOption(
                    "--table and --target are required without --request".to_string(),
                )
                .into());
            };
            AnalysisRequest::new(table, target)
        }
    };

    if let Some(table) = &args.table {
        request.table.clone_from(table);
    }
    if let Some(target) = &args.target {
        request.target_column.clone_from(target);
    }
    if let Some(date) = &args.date {
        request.date_column = Some(date.clone());
    }
    if let Some(limit) = args.limit {
        request.limit = limit;
    }
    if let Some(max_rows) = args.max_rows {
        request.max_rows = Some(max_rows);
    }
    if let Some(name) = &args.anomaly_method {
        request.options.anomaly_method = AnomalyMethod::from_name_or_default(name);
    }
    if let Some(name) = &args.forecast_method {
        request.options.forecast_method = ForecastMethod::from_name_or_default(name);
    }
    if let Some(threshold) = args.threshold {
        request.options.anomaly_threshold = threshold;
    }
    if let Some(periods) = args.periods {
        request.options.forecast_periods = periods;
    }
    if let Some(seed) = args.seed {
        request.options.seed = seed;
    }
    Ok(request)
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisResult> {
    let request = build_request(args)?;
    let span = info_span!("analyze", table = %request.table);
    let _guard = span.enter();
    debug!(
        data_dir = %args.data_dir.display(),
        limit = request.effective_limit(),
        "analysis request"
    );

    let source = CsvDirectorySource::new(&args.data_dir)
        .with_context(|| format!("open data directory {}", args.data_dir.display()))?;
    let runner = PipelineRunner::new(source);
    runner
        .analyze(&request)
        .with_context(|| format!("analyze table {}", request.table))
}

/// Process exit code for a failed command.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<InsightError>() {
        Some(insight) if insight.is_validation() => EXIT_VALIDATION,
        _ => EXIT_FAILURE,
    }
}
