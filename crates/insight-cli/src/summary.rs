use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use insight_ingest::{TableInfo, format_numeric};
use insight_model::{AnalysisResult, AnomalyRecord, Severity};

pub fn print_tables(tables: &[TableInfo]) {
    if tables.is_empty() {
        println!("No tables found.");
        return;
    }
    println!("{}", tables_table(tables));
}

pub fn print_analysis(result: &AnalysisResult) {
    println!("{}", metrics_table(result));
    if result.anomalies.is_empty() {
        println!("No anomalies flagged.");
    } else {
        println!("{}", anomaly_table(&result.anomalies));
    }
    if !result.forecast.is_empty() {
        println!("{}", forecast_table(result));
    }
    println!("Steps: {}", result.pipeline_steps.join(" -> "));
}

pub fn tables_table(tables: &[TableInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Columns")]);
    apply_table_style(&mut table);
    for info in tables {
        table.add_row(vec![
            Cell::new(&info.name).add_attribute(Attribute::Bold),
            Cell::new(info.columns.join(", ")),
        ]);
    }
    table
}

pub fn metrics_table(result: &AnalysisResult) -> Table {
    let metrics = &result.metrics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Target", Cell::new(&metrics.target_column)),
        ("Rows", Cell::new(metrics.rows)),
        ("Dropped rows", count_cell(metrics.dropped_rows, Color::Yellow)),
        ("Anomalies", count_cell(metrics.anomaly_count, Color::Red)),
        ("High severity", count_cell(result.high_severity_count(), Color::Red)),
        ("Anomaly method", Cell::new(metrics.anomaly_method)),
        ("Forecast method", Cell::new(metrics.forecast_method)),
        ("Forecast horizon", Cell::new(metrics.forecast_horizon)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value]);
    }
    table
}

pub fn anomaly_table(records: &[AnomalyRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Timestamp"),
        header_cell("Metric"),
        header_cell("Value"),
        header_cell("Z-score"),
        header_cell("Score"),
        header_cell("Severity"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in records {
        table.add_row(vec![
            Cell::new(&record.timestamp),
            Cell::new(&record.metric),
            number_cell(record.value),
            number_cell(record.z_score),
            number_cell(record.score),
            severity_cell(record.severity),
        ]);
    }
    table
}

pub fn forecast_table(result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Date"), header_cell("Prediction")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for point in &result.forecast {
        table.add_row(vec![
            Cell::new(&point.date),
            Cell::new(format_numeric(round4(point.prediction))),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_numeric(round4(value))),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
    };
    Cell::new(severity.as_str()).fg(color).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
