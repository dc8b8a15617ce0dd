//! Daily log spreadsheet (CSV)
//!
//! Fixed row-positional layout, shared with log files written by earlier
//! releases. Rows are 0-indexed:
//!
//! | row | contents                                          |
//! |-----|---------------------------------------------------|
//! | 0   | header: Date, Weight (kg), File name              |
//! | 1   | date, weight, file name                           |
//! | 3   | goal headers                                      |
//! | 4   | goals: protein, carbohydrate, fat, calories       |
//! | 6   | consumed headers                                  |
//! | 7   | consumed totals, same order                       |
//! | 9   | percentage headers                                |
//! | 10  | consumed percentages, same order                  |
//! | 12  | header: Consumed Ingredients, Consumed Amount (g) |
//! | 13+ | display name, comma-joined amount history         |
//!
//! Every row is padded to four columns; blank rows are four empty cells.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{encode_rows, read_rows, write_document, StoreError, StoreResult};
use crate::models::{display_name, Catalog, Nutrient, Nutrition, UserProfile};

pub const DATE_ROW: usize = 1;
pub const GOALS_ROW: usize = 4;
pub const CONSUMED_ROW: usize = 7;
pub const PERCENT_ROW: usize = 10;
pub const INGREDIENT_HEADER_ROW: usize = 12;
pub const FIRST_INGREDIENT_ROW: usize = 13;

const ROW_WIDTH: usize = 4;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_headers() -> Vec<String> {
    vec!["Date".to_string(), "Weight (kg)".to_string(), "File name".to_string()]
}

pub(crate) fn goal_headers() -> Vec<String> {
    Nutrient::ALL.iter().map(|k| format!("{} Goal ({})", k.label(), k.unit())).collect()
}

pub(crate) fn consumed_headers() -> Vec<String> {
    Nutrient::ALL.iter().map(|k| format!("{} Consumed ({})", k.label(), k.unit())).collect()
}

pub(crate) fn percent_headers() -> Vec<String> {
    Nutrient::ALL.iter().map(|k| format!("{} Percentage (%)", k.label())).collect()
}

pub(crate) fn nutrient_cells(values: &Nutrition) -> Vec<String> {
    values.values().iter().map(|v| v.to_string()).collect()
}

/// One consumed-ingredient line of the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub display_name: String,
    pub amounts: Vec<f64>,
}

/// Named view of the positional spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct LogSheet {
    pub date: NaiveDate,
    pub weight: f64,
    pub file_name: String,
    pub goals: Nutrition,
    pub consumed: Nutrition,
    pub percentages: Nutrition,
    pub ingredients: Vec<IngredientLine>,
}

impl LogSheet {
    pub fn from_profile(profile: &UserProfile, percentages: &Nutrition, file_name: &str) -> Self {
        Self {
            date: profile.date,
            weight: profile.weight,
            file_name: file_name.to_string(),
            goals: profile.goals,
            consumed: profile.consumed_totals,
            percentages: *percentages,
            ingredients: profile
                .consumed_ingredients
                .iter()
                .map(|(name, amounts)| IngredientLine {
                    display_name: display_name(name),
                    amounts: amounts.clone(),
                })
                .collect(),
        }
    }

    /// Profile restored from the sheet; `log_path` is where it was read from.
    ///
    /// Display names are mapped back to `catalog` keys where one matches.
    pub fn into_profile(self, log_path: &Path, catalog: &Catalog) -> UserProfile {
        let mut profile = UserProfile::new(self.date, self.weight, log_path.to_path_buf(), self.goals);
        profile.consumed_totals = self.consumed;
        for line in self.ingredients {
            profile
                .consumed_ingredients
                .entry(catalog.key_for_display_name(&line.display_name))
                .or_default()
                .extend(line.amounts);
        }
        profile
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let blank = Vec::new();
        let mut rows = vec![
            date_headers(),
            vec![
                self.date.format(DATE_FORMAT).to_string(),
                self.weight.to_string(),
                self.file_name.clone(),
            ],
            blank.clone(),
            goal_headers(),
            nutrient_cells(&self.goals),
            blank.clone(),
            consumed_headers(),
            nutrient_cells(&self.consumed),
            blank.clone(),
            percent_headers(),
            nutrient_cells(&self.percentages),
            blank,
            vec!["Consumed Ingredients".to_string(), "Consumed Amount (g)".to_string()],
        ];
        for line in &self.ingredients {
            let amounts: Vec<String> = line.amounts.iter().map(|a| a.to_string()).collect();
            rows.push(vec![line.display_name.clone(), amounts.join(",")]);
        }
        for row in rows.iter_mut() {
            row.resize(ROW_WIDTH, String::new());
        }
        rows
    }

    pub fn from_rows(rows: &[Vec<String>]) -> Result<Self, String> {
        if rows.len() < FIRST_INGREDIENT_ROW {
            return Err(format!(
                "expected at least {} rows, found {}",
                FIRST_INGREDIENT_ROW,
                rows.len()
            ));
        }

        let date_text = cell(rows, DATE_ROW, 0)?;
        let date = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT)
            .map_err(|e| format!("row {} column 0: bad date {:?}: {}", DATE_ROW, date_text, e))?;

        let mut ingredients = Vec::new();
        for row in &rows[FIRST_INGREDIENT_ROW..] {
            let name = row.first().map(|s| s.trim()).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let history = row.get(1).map(String::as_str).unwrap_or("");
            ingredients.push(IngredientLine {
                display_name: name.to_string(),
                amounts: parse_amounts(history)?,
            });
        }

        Ok(Self {
            date,
            weight: number(rows, DATE_ROW, 1)?,
            file_name: cell(rows, DATE_ROW, 2)?.trim().to_string(),
            goals: nutrient_row(rows, GOALS_ROW)?,
            consumed: nutrient_row(rows, CONSUMED_ROW)?,
            percentages: nutrient_row(rows, PERCENT_ROW)?,
            ingredients,
        })
    }
}

fn cell(rows: &[Vec<String>], row: usize, col: usize) -> Result<&str, String> {
    rows.get(row)
        .and_then(|r| r.get(col))
        .map(String::as_str)
        .ok_or_else(|| format!("missing cell at row {} column {}", row, col))
}

fn number(rows: &[Vec<String>], row: usize, col: usize) -> Result<f64, String> {
    let text = cell(rows, row, col)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("row {} column {}: not a number: {:?}", row, col, text))
}

fn nutrient_row(rows: &[Vec<String>], row: usize) -> Result<Nutrition, String> {
    let mut values = Nutrition::zero();
    for (col, nutrient) in Nutrient::ALL.iter().enumerate() {
        values.set(*nutrient, number(rows, row, col)?);
    }
    Ok(values)
}

fn parse_amounts(history: &str) -> Result<Vec<f64>, String> {
    history
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| format!("bad amount {:?}", s)))
        .collect()
}

/// Read and parse a log sheet
pub fn read_sheet(path: &Path) -> StoreResult<LogSheet> {
    let rows = read_rows(path)?;
    LogSheet::from_rows(&rows).map_err(|message| StoreError::format(path, message))
}

/// Write `profile` as a log sheet at `path`
pub fn export_csv(profile: &UserProfile, percentages: &Nutrition, path: &Path) -> StoreResult<()> {
    let file_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sheet = LogSheet::from_profile(profile, percentages, &file_name);
    let bytes = encode_rows(path, &sheet.to_rows())?;
    write_document(path, &bytes)?;
    info!(path = %path.display(), ingredients = sheet.ingredients.len(), "Exported log");
    Ok(())
}

/// Read a log sheet back into a profile, resolving ingredient names against `catalog`
pub fn import_csv(path: &Path, catalog: &Catalog) -> StoreResult<UserProfile> {
    let sheet = read_sheet(path)?;
    debug!(path = %path.display(), date = %sheet.date, "Imported log");
    Ok(sheet.into_profile(path, catalog))
}
