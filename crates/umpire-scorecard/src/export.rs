// CSV export of the summary and ranked tables.

use crate::aggregate::{SummaryTable, UmpireSummary};
use crate::ranking::RankedTable;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Summary columns, in export order.
pub const SUMMARY_COLUMNS: [&str; 14] = [
    "Umpire", "GC", "PC", "IC", "xIC", "CC", "xCC", "CCAx", "Acc", "xAcc", "AAx", "Con",
    "Fav [H]", "totRI",
];

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn format_value(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => {
            let rounded = round_to(v, decimals);
            // Avoid printing "-0"
            if rounded == 0.0 {
                "0".to_string()
            } else {
                rounded.to_string()
            }
        }
        None => String::new(),
    }
}

fn summary_fields(s: &UmpireSummary, decimals: u32) -> Vec<String> {
    let mut fields = vec![s.umpire.clone(), s.games_called.to_string()];
    let numeric = [
        Some(s.pitches_called),
        Some(s.incorrect_calls),
        Some(s.expected_incorrect_calls),
        Some(s.correct_calls),
        Some(s.expected_correct_calls),
        s.correct_calls_above_expected,
        s.accuracy,
        s.expected_accuracy,
        s.accuracy_above_expected,
        s.consistency,
        s.home_favor,
        s.total_run_impact,
    ];
    fields.extend(numeric.iter().map(|v| format_value(*v, decimals)));
    fields
}

/// Header of the ranked table for its configured metrics.
pub fn ranked_header(table: &RankedTable) -> Vec<String> {
    let mut header: Vec<String> = SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.push("IC_per_100".into());
    header.extend(table.metrics().iter().map(|m| m.field.pct_label()));
    header.push("avg_pct".into());
    header.push("Fav_pct".into());
    header
}

// ---------------------------------------------------------------------------
// Writer-based exporters (enable testing without temp files)
// ---------------------------------------------------------------------------

pub fn write_summary<W: Write>(
    wtr: W,
    table: &SummaryTable,
    decimals: u32,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(SUMMARY_COLUMNS)?;
    for s in table.rows() {
        writer.write_record(summary_fields(s, decimals))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ranked<W: Write>(
    wtr: W,
    table: &RankedTable,
    decimals: u32,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(ranked_header(table))?;
    for row in table.rows() {
        let mut fields = summary_fields(&row.summary, decimals);
        fields.push(format_value(Some(row.ic_per_100), decimals));
        fields.extend(row.percentiles.iter().map(|p| format_value(p.value, decimals)));
        fields.push(format_value(row.avg_pct, decimals));
        fields.push(format_value(row.fav_pct, decimals));
        writer.write_record(fields)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Path-based exporters
// ---------------------------------------------------------------------------

fn create_file(path: &Path) -> Result<std::fs::File, ExportError> {
    let io_err = |e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::File::create(path).map_err(io_err)
}

/// Write the per-umpire summary table to a CSV file.
pub fn export_summary(path: &Path, table: &SummaryTable, decimals: u32) -> Result<(), ExportError> {
    let file = create_file(path)?;
    write_summary(file, table, decimals).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("wrote {} summary rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the ranked table to a CSV file.
pub fn export_ranked(path: &Path, table: &RankedTable, decimals: u32) -> Result<(), ExportError> {
    let file = create_file(path)?;
    write_ranked(file, table, decimals).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("wrote {} ranked rows to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
