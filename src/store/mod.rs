//! Document store
//!
//! Flat JSON and CSV files on disk. Every call reads a document fully or
//! rewrites it fully; there is no locking, so callers must serialize writers.

pub mod catalog;
pub mod error;
pub mod log_csv;
pub mod profile;
pub mod report;

use std::fs;
use std::path::Path;

pub use catalog::CatalogStore;
pub use error::{StoreError, StoreResult};
pub use log_csv::{export_csv, import_csv, LogSheet};
pub use profile::ProfileStore;
pub use report::{merge_logs, unique_path, ReportSummary};

/// Overwrite `path`, creating parent directories as needed
pub(crate) fn write_document(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| StoreError::io(path, e))
}

/// All records of a header-less CSV file; rows may differ in length
pub(crate) fn read_rows(path: &Path) -> StoreResult<Vec<Vec<String>>> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::format(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub(crate) fn encode_rows(path: &Path, rows: &[Vec<String>]) -> StoreResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).map_err(|e| StoreError::format(path, e))?;
    }
    writer.into_inner().map_err(|e| StoreError::format(path, e))
}
