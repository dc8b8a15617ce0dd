//! Intake tools
//!
//! Picking ingredients, committing them to the day, and goal progress.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::{failure, validate_amount};
use crate::models::{display_name, Nutrition};
use crate::nutrition::{format_selection_summary, ProgressRow};
use crate::session::Session;
use crate::store::StoreError;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectIngredientRequest {
    /// Catalog key, e.g. "chicken_breast"
    pub name: String,
    /// Grams eaten; defaults to the ingredient's custom serving size
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeselectIngredientRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetSelectionAmountRequest {
    pub name: String,
    /// Grams eaten
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct SelectedIngredient {
    pub name: String,
    pub display_name: String,
    pub amount: f64,
    pub nutrition: Nutrition,
}

/// Current selection with its combined nutrition
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    /// False when the request changed nothing (already selected / not selected)
    pub changed: bool,
    pub ingredients: Vec<SelectedIngredient>,
    pub totals: Nutrition,
    pub summary: String,
    pub can_commit: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateIntakeResponse {
    pub success: bool,
    pub ingredients: Vec<String>,
    pub added: Nutrition,
    pub consumed_totals: Nutrition,
    pub progress: Vec<ProgressRow>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub date: String,
    pub weight: f64,
    pub rows: Vec<ProgressRow>,
}

fn selection_response(session: &Session, changed: bool) -> SelectionResponse {
    let ingredients = session
        .selection()
        .iter()
        .map(|(name, amount)| SelectedIngredient {
            name: name.to_string(),
            display_name: display_name(name),
            amount,
            nutrition: session
                .catalog()
                .get(name)
                .map(|fact| fact.nutrition_for(amount).round2())
                .unwrap_or_default(),
        })
        .collect();
    let totals = session.selection_totals();

    SelectionResponse {
        changed,
        ingredients,
        summary: format_selection_summary(&totals),
        totals,
        can_commit: !session.selection().is_empty(),
    }
}

pub fn get_selection(session: &Session) -> SelectionResponse {
    selection_response(session, false)
}

pub fn select_ingredient(session: &mut Session, req: SelectIngredientRequest) -> Result<SelectionResponse, String> {
    if let Some(amount) = req.amount {
        validate_amount(amount)?;
    }
    let changed = session.select(&req.name, req.amount).map_err(|e| match e {
        StoreError::NotFound(name) => format!("Ingredient not found: {}", name),
        other => other.to_string(),
    })?;
    Ok(selection_response(session, changed))
}

pub fn deselect_ingredient(session: &mut Session, req: DeselectIngredientRequest) -> SelectionResponse {
    let changed = session.deselect(&req.name);
    selection_response(session, changed)
}

pub fn set_selection_amount(session: &mut Session, req: SetSelectionAmountRequest) -> Result<SelectionResponse, String> {
    validate_amount(req.amount)?;
    if !session.set_selection_amount(&req.name, req.amount) {
        return Err(format!("Ingredient is not selected: {}", req.name));
    }
    Ok(selection_response(session, true))
}

pub fn clear_selection(session: &mut Session) -> SelectionResponse {
    let changed = !session.selection().is_empty();
    session.clear_selection();
    selection_response(session, changed)
}

/// Commit the selection to today's log
pub fn update_intake(session: &mut Session) -> Result<UpdateIntakeResponse, String> {
    if session.selection().is_empty() {
        return Err("No ingredients selected".to_string());
    }

    let outcome = session
        .commit_selection()
        .map_err(|e| failure("Updating intake", e))?;

    Ok(UpdateIntakeResponse {
        success: true,
        ingredients: outcome.ingredients,
        added: outcome.added,
        consumed_totals: outcome.consumed_totals,
        progress: session.progress(),
    })
}

pub fn get_progress(session: &Session) -> ProgressResponse {
    let profile = session.profile();
    ProgressResponse {
        date: profile.date.format("%Y-%m-%d").to_string(),
        weight: profile.weight,
        rows: session.progress(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        let config = Config::with_data_dir(dir.path());
        fs::write(
            &config.catalog_path,
            r#"{"chicken_breast": {"nutrition": {"protein": 31, "carbohydrate": 0, "fat": 3.6, "calories": 165},
                                   "reference_serving_size": 100, "custom_serving_size": 150}}"#,
        )
        .unwrap();
        Session::open(config, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_select_reports_summary() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let resp = select_ingredient(
            &mut session,
            SelectIngredientRequest { name: "chicken_breast".to_string(), amount: None },
        )
        .unwrap();
        assert!(resp.changed);
        assert!(resp.can_commit);
        assert_eq!(resp.ingredients[0].display_name, "Chicken Breast");
        assert_eq!(resp.summary, "Protein: 46.5g | Carbohydrate: 0g | Fat: 5.4g");
    }

    #[test]
    fn test_rejects_bad_requests() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        assert!(select_ingredient(
            &mut session,
            SelectIngredientRequest { name: "tofu".to_string(), amount: None },
        )
        .is_err());
        assert!(select_ingredient(
            &mut session,
            SelectIngredientRequest { name: "chicken_breast".to_string(), amount: Some(0.0) },
        )
        .is_err());
        assert!(update_intake(&mut session).is_err());
        assert!(!deselect_ingredient(&mut session, DeselectIngredientRequest { name: "tofu".to_string() }).changed);
    }

    #[test]
    fn test_update_intake_reports_progress() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        select_ingredient(
            &mut session,
            SelectIngredientRequest { name: "chicken_breast".to_string(), amount: Some(100.0) },
        )
        .unwrap();

        let resp = update_intake(&mut session).unwrap();
        assert_eq!(resp.added, Nutrition::new(31.0, 0.0, 3.6, 165.0));
        assert_eq!(resp.progress[0].consumed, 31.0);
        assert_eq!(resp.progress[0].label_percent, 15.5);
        assert!(!get_selection(&session).can_commit);
    }
}
