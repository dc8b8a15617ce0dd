//! Nutriflow Status Tool
//!
//! Runtime status of the service and the files it works on.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::session::Session;

/// Intake logging instructions for AI assistants
pub const INTAKE_INSTRUCTIONS: &str = r#"
# Nutriflow Intake Logging Instructions

Nutriflow tracks protein, carbohydrate, fat and calories for one day at a time.

## Catalog

Each ingredient stores its nutrition for a reference serving size in grams,
plus a custom serving size used as the default amount when it is selected.

- `search_ingredients` - case-insensitive substring search; `sort_by` is one
  of `alphabetical`, `frequency`, `protein`, `carbohydrate`
- `get_ingredient` - full facts for one ingredient
- `update_serving_sizes` - change custom serving sizes (saved immediately)

## Logging a meal

1. `select_ingredient` for each ingredient eaten. The amount defaults to the
   custom serving size; pass `amount` (grams) to override.
2. `set_selection_amount` / `deselect_ingredient` to adjust.
3. `get_selection` shows the running totals.
4. `update_intake` commits the selection: custom serving sizes are saved to
   the catalog, the totals are added to the profile and the selection clears.

Nothing is written until `update_intake` is called.

## Progress and logs

- `get_progress` - goal, consumed and percent of goal per nutrient
- `get_profile` - the active profile document
- `new_log` - start an empty day (optional weight and goals)
- `export_log` / `import_log` - write or load a CSV daily log
- `generate_report` - merge every CSV log in the log directory into
  `report_log_<date>.csv`

Dates are `YYYY-MM-DD`.
"#;

#[derive(Debug, Clone, Serialize)]
pub struct NutriflowStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Data files
    pub catalog_path: String,
    pub catalog_ingredients: usize,
    pub profile_path: String,
    pub profile_exists: bool,
    pub profile_date: String,
    pub log_dir: String,
    pub report_dir: String,
    pub pending_selection: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service runtime status
pub struct StatusTracker {
    start_time: Instant,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, session: &Session) -> NutriflowStatus {
        let build_info = BuildInfo::current();
        let config = session.config();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriflowStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            catalog_path: config.catalog_path.display().to_string(),
            catalog_ingredients: session.catalog().len(),
            profile_path: config.profile_path.display().to_string(),
            profile_exists: config.profile_path.is_file(),
            profile_date: session.profile().date.format("%Y-%m-%d").to_string(),
            log_dir: config.log_dir.display().to_string(),
            report_dir: config.report_dir.display().to_string(),
            pending_selection: session.selection().len(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_status_reports_session_files() {
        let dir = TempDir::new().unwrap();
        let config = Config::with_data_dir(dir.path());
        std::fs::write(&config.catalog_path, r#"{"egg": {"nutrition": {"protein": 6}, "reference_serving_size": 50}}"#)
            .unwrap();
        let session = Session::open(config, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).unwrap();

        let status = StatusTracker::new().get_status(&session);
        assert_eq!(status.catalog_ingredients, 1);
        assert!(status.profile_exists);
        assert_eq!(status.profile_date, "2024-03-09");
        assert_eq!(status.pending_selection, 0);
        assert_eq!(status.process_id, std::process::id());
    }
}
