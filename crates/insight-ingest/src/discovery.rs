//! CSV file discovery for directory-backed sources.

use std::path::{Path, PathBuf};

use insight_model::{InsightError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(InsightError::source_failure(
            dir.display().to_string(),
            "directory not found",
        ));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Table name for a CSV file: its file stem.
pub fn table_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Read only the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| csv_error(path, &error))?;
    let headers = reader.headers().map_err(|error| csv_error(path, &error))?;
    Ok(headers
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect())
}

fn csv_error(path: &Path, error: &csv::Error) -> InsightError {
    InsightError::source_failure(path.display().to_string(), error)
}
