//! Report exporter
//!
//! Merges every daily log in a directory into one summary spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::log_csv::{self, consumed_headers, date_headers, goal_headers, nutrient_cells, percent_headers};
use super::{encode_rows, write_document, StoreError, StoreResult};

/// File name prefix of generated reports; such files are never merged again
pub const REPORT_PREFIX: &str = "report_log_";

/// Outcome of a report merge
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub logs_merged: usize,
    pub skipped: Vec<PathBuf>,
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", REPORT_PREFIX, date.format("%Y-%m-%d"))
}

/// `dir/file_name`, or `dir/stem(N).ext` with the first free N from 1
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}({}){}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// CSV logs in `dir` sorted by file name, excluding generated reports
pub fn discover_logs(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut logs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
        let is_csv = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        let is_report = path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().starts_with(REPORT_PREFIX));
        if path.is_file() && is_csv && !is_report {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

fn report_header() -> Vec<String> {
    let mut header = date_headers();
    header.extend(goal_headers());
    header.extend(consumed_headers());
    header.extend(percent_headers());
    header
}

/// Write `report_log_<date>.csv` into `report_dir` with one summary row per log.
///
/// Logs that fail to parse are skipped and listed in the summary.
pub fn merge_logs(log_dir: &Path, report_dir: &Path, date: NaiveDate) -> StoreResult<ReportSummary> {
    let logs = discover_logs(log_dir)?;

    let mut rows = vec![report_header()];
    let mut skipped = Vec::new();
    for log in &logs {
        match log_csv::read_sheet(log) {
            Ok(sheet) => {
                let mut row = vec![
                    sheet.date.format("%Y-%m-%d").to_string(),
                    sheet.weight.to_string(),
                    sheet.file_name.clone(),
                ];
                row.extend(nutrient_cells(&sheet.goals));
                row.extend(nutrient_cells(&sheet.consumed));
                row.extend(nutrient_cells(&sheet.percentages));
                rows.push(row);
            }
            Err(e) => {
                warn!(path = %log.display(), error = %e, "Skipping unreadable log");
                skipped.push(log.clone());
            }
        }
    }

    let path = unique_path(report_dir, &report_file_name(date));
    let bytes = encode_rows(&path, &rows)?;
    write_document(&path, &bytes)?;

    let logs_merged = rows.len() - 1;
    info!(path = %path.display(), logs_merged, skipped = skipped.len(), "Report generated");
    Ok(ReportSummary { path, logs_merged, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrition, UserProfile};
    use crate::store::read_rows;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, date: NaiveDate) {
        let mut profile = UserProfile::new(date, 70.0, dir.join(name), Nutrition::new(200.0, 350.0, 70.0, 2000.0));
        profile.record("egg", 100.0);
        profile.consumed_totals = Nutrition::new(13.0, 1.1, 11.0, 155.0);
        log_csv::export_csv(&profile, &Nutrition::new(6.5, 0.31, 15.71, 7.75), &dir.join(name)).unwrap();
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = TempDir::new().unwrap();
        assert_eq!(unique_path(dir.path(), "report_log_2024-01-01.csv"), dir.path().join("report_log_2024-01-01.csv"));

        fs::write(dir.path().join("report_log_2024-01-01.csv"), "").unwrap();
        assert_eq!(unique_path(dir.path(), "report_log_2024-01-01.csv"), dir.path().join("report_log_2024-01-01(1).csv"));

        fs::write(dir.path().join("report_log_2024-01-01(1).csv"), "").unwrap();
        assert_eq!(unique_path(dir.path(), "report_log_2024-01-01.csv"), dir.path().join("report_log_2024-01-01(2).csv"));
    }

    #[test]
    fn test_merge_does_not_overwrite_existing_report() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "nutrition_log_2024-01-01.csv", day(1));
        fs::write(dir.path().join("report_log_2024-01-01.csv"), "previous").unwrap();

        let summary = merge_logs(dir.path(), dir.path(), day(1)).unwrap();
        assert_eq!(summary.path, dir.path().join("report_log_2024-01-01(1).csv"));
        assert_eq!(fs::read_to_string(dir.path().join("report_log_2024-01-01.csv")).unwrap(), "previous");
    }

    #[test]
    fn test_merge_one_row_per_log() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "nutrition_log_2024-01-02.csv", day(2));
        write_log(dir.path(), "nutrition_log_2024-01-01.csv", day(1));
        fs::write(dir.path().join("broken.csv"), "garbage\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let summary = merge_logs(dir.path(), dir.path(), day(3)).unwrap();
        assert_eq!(summary.logs_merged, 2);
        assert_eq!(summary.skipped, vec![dir.path().join("broken.csv")]);

        let rows = read_rows(&summary.path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "Date");
        assert_eq!(rows[0].len(), 15);
        assert_eq!(rows[1][0], "2024-01-01");
        assert_eq!(rows[2][0], "2024-01-02");
        assert_eq!(rows[1][7], "13");
    }

    #[test]
    fn test_missing_log_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = merge_logs(&dir.path().join("absent"), dir.path(), day(1));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
