//! Log tools
//!
//! Creating, importing and exporting daily CSV logs, and merging them into
//! a report.

use std::path::PathBuf;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::{failure, parse_date, today};
use crate::models::{Nutrient, Nutrition, UserProfile};
use crate::session::Session;
use crate::store::ReportSummary;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NewLogRequest {
    /// Where to write the new CSV log (default: log directory)
    pub path: Option<String>,
    /// Body weight in kg (default from config)
    pub weight: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carbohydrate_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub calories_goal: Option<f64>,
}

impl NewLogRequest {
    fn goal(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Protein => self.protein_goal,
            Nutrient::Carbohydrate => self.carbohydrate_goal,
            Nutrient::Fat => self.fat_goal,
            Nutrient::Calories => self.calories_goal,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportLogRequest {
    /// CSV log to load as the active profile
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportLogRequest {
    /// Destination CSV (default: nutrition_log_<date>.csv in the log directory)
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateReportRequest {
    /// Date in the report file name, YYYY-MM-DD (default: today)
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogFileResponse {
    pub success: bool,
    pub path: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub logs_merged: usize,
    pub skipped: Vec<String>,
}

impl From<ReportSummary> for GenerateReportResponse {
    fn from(summary: ReportSummary) -> Self {
        Self {
            success: true,
            file_path: summary.path.display().to_string(),
            logs_merged: summary.logs_merged,
            skipped: summary.skipped.iter().map(|p| p.display().to_string()).collect(),
        }
    }
}

fn log_file_response(path: PathBuf, profile: &UserProfile) -> LogFileResponse {
    LogFileResponse {
        success: true,
        path: path.display().to_string(),
        date: profile.date.format("%Y-%m-%d").to_string(),
    }
}

pub fn get_profile(session: &Session) -> UserProfile {
    session.profile().clone()
}

/// Start a new, empty daily log
pub fn new_log(session: &mut Session, req: NewLogRequest) -> Result<LogFileResponse, String> {
    if let Some(weight) = req.weight {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(format!("Weight must be greater than 0, got {}", weight));
        }
    }

    let defaults = session.config().default_goals;
    let mut goals = Nutrition::zero();
    for nutrient in Nutrient::ALL {
        let goal = req.goal(nutrient).unwrap_or(defaults.get(nutrient));
        if !(goal.is_finite() && goal > 0.0) {
            return Err(format!("{} goal must be greater than 0, got {}", nutrient.label(), goal));
        }
        goals.set(nutrient, goal);
    }

    let path = session
        .new_log(req.path.map(PathBuf::from), req.weight, Some(goals), today())
        .map_err(|e| failure("Creating new log", e))?;
    Ok(log_file_response(path, session.profile()))
}

/// Replace the active profile with a CSV log
pub fn import_log(session: &mut Session, req: ImportLogRequest) -> Result<LogFileResponse, String> {
    let path = PathBuf::from(&req.path);
    session
        .import_log(&path)
        .map_err(|e| failure("Importing log", e))?;
    Ok(log_file_response(path, session.profile()))
}

/// Write the active profile to CSV
pub fn export_log(session: &Session, req: ExportLogRequest) -> Result<LogFileResponse, String> {
    let path = session
        .export_log(req.path.map(PathBuf::from), today())
        .map_err(|e| failure("Exporting log", e))?;
    Ok(log_file_response(path, session.profile()))
}

/// Merge every log in the log directory into one report
pub fn generate_report(session: &Session, req: GenerateReportRequest) -> Result<GenerateReportResponse, String> {
    let date = match req.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    session
        .generate_report(date)
        .map(GenerateReportResponse::from)
        .map_err(|e| failure("Generating report", e))
}
