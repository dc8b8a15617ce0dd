//! Ingredient catalog tools
//!
//! Browsing the catalog and editing custom serving sizes.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::{failure, validate_amount};
use crate::models::{display_name, CustomServingEdit, IngredientFact, Nutrition, SortOrder};
use crate::session::Session;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchIngredientsRequest {
    /// Case-insensitive name filter (optional)
    #[serde(default)]
    pub query: Option<String>,
    /// alphabetical (default), frequency, protein or carbohydrate
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize { 100 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetIngredientRequest {
    /// Catalog key, e.g. "chicken_breast"
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ServingSizeEdit {
    pub name: String,
    /// New custom serving size in grams
    pub custom_serving_size: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateServingSizesRequest {
    pub edits: Vec<ServingSizeEdit>,
}

/// Summary of an ingredient for list/search results
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub name: String,
    pub display_name: String,
    pub reference_serving_size: f64,
    pub custom_serving_size: f64,
    pub nutrition: Nutrition,
    pub servings_today: usize,
}

#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub items: Vec<IngredientSummary>,
    pub total: usize,
    pub sort_by: &'static str,
}

/// Full ingredient detail
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    pub name: String,
    pub display_name: String,
    pub nutrition: Nutrition,
    pub reference_serving_size: f64,
    pub custom_serving_size: f64,
    /// Nutrition at the custom serving size
    pub custom_nutrition: Nutrition,
    pub image: Option<String>,
    pub consumed_today: Vec<f64>,
    pub selected_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateServingSizesResponse {
    pub success: bool,
    pub applied: usize,
    pub ignored: usize,
}

fn summary(session: &Session, name: &str, fact: &IngredientFact) -> IngredientSummary {
    IngredientSummary {
        name: name.to_string(),
        display_name: display_name(name),
        reference_serving_size: fact.reference_serving_size,
        custom_serving_size: fact.custom_serving_size,
        nutrition: fact.nutrition,
        servings_today: session.profile().servings_of(name),
    }
}

/// Search and sort the catalog
pub fn search_ingredients(session: &Session, req: SearchIngredientsRequest) -> Result<ListIngredientsResponse, String> {
    let order = match req.sort_by.as_deref() {
        None => SortOrder::default(),
        Some(s) => SortOrder::from_str(s).ok_or_else(|| format!("Unknown sort order: {}", s))?,
    };
    let limit = req.limit.clamp(1, 500);

    let found = session.browse(req.query.as_deref().unwrap_or(""), order);
    let total = found.len();
    let items = found
        .into_iter()
        .take(limit)
        .map(|(name, fact)| summary(session, name, fact))
        .collect();

    Ok(ListIngredientsResponse { items, total, sort_by: order.as_str() })
}

/// Get one ingredient with today's usage
pub fn get_ingredient(session: &Session, req: GetIngredientRequest) -> Result<Option<IngredientDetail>, String> {
    let Some(fact) = session.catalog().get(&req.name) else {
        return Ok(None);
    };

    Ok(Some(IngredientDetail {
        display_name: display_name(&req.name),
        nutrition: fact.nutrition,
        reference_serving_size: fact.reference_serving_size,
        custom_serving_size: fact.custom_serving_size,
        custom_nutrition: fact.custom_nutrition().round2(),
        image: fact.image.clone(),
        consumed_today: session
            .profile()
            .consumed_ingredients
            .get(&req.name)
            .cloned()
            .unwrap_or_default(),
        selected_amount: session.selection().amount(&req.name),
        name: req.name,
    }))
}

/// Overwrite custom serving sizes; unknown names are ignored
pub fn update_serving_sizes(session: &mut Session, req: UpdateServingSizesRequest) -> Result<UpdateServingSizesResponse, String> {
    for edit in &req.edits {
        validate_amount(edit.custom_serving_size)?;
    }
    let edits: Vec<CustomServingEdit> = req
        .edits
        .into_iter()
        .map(|e| CustomServingEdit { name: e.name, custom_serving_size: e.custom_serving_size })
        .collect();

    let applied = session
        .apply_serving_sizes(&edits)
        .map_err(|e| failure("Updating serving sizes", e))?;

    Ok(UpdateServingSizesResponse {
        success: true,
        applied,
        ignored: edits.len() - applied,
    })
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
                                   "reference_serving_size": 100, "custom_serving_size": 150},
                "oats": {"nutrition": {"protein": 13, "carbohydrate": 67, "fat": 7, "calories": 379},
                         "reference_serving_size": 100}}"#,
        )
        .unwrap();
        Session::open(config, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    fn search(session: &Session, query: Option<&str>, sort_by: Option<&str>) -> Result<ListIngredientsResponse, String> {
        search_ingredients(
            session,
            SearchIngredientsRequest {
                query: query.map(str::to_string),
                sort_by: sort_by.map(str::to_string),
                limit: 100,
            },
        )
    }

    #[test]
    fn test_search_and_sort() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir);

        let all = search(&session, None, None).unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.items[0].name, "chicken_breast");
        assert_eq!(all.sort_by, "alphabetical");

        let carbs = search(&session, None, Some("carbohydrate")).unwrap();
        assert_eq!(carbs.items[0].name, "oats");

        let found = search(&session, Some("CHICK"), None).unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].display_name, "Chicken Breast");

        assert!(search(&session, None, Some("recently_used")).is_err());
    }

    #[test]
    fn test_get_ingredient() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir);
        let detail = get_ingredient(&session, GetIngredientRequest { name: "chicken_breast".to_string() })
            .unwrap()
            .unwrap();
        assert_eq!(detail.custom_nutrition, Nutrition::new(46.5, 0.0, 5.4, 247.5));
        assert!(detail.consumed_today.is_empty());

        let missing = get_ingredient(&session, GetIngredientRequest { name: "kiwi".to_string() }).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_update_serving_sizes() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let resp = update_serving_sizes(
            &mut session,
            UpdateServingSizesRequest {
                edits: vec![
                    ServingSizeEdit { name: "oats".to_string(), custom_serving_size: 40.0 },
                    ServingSizeEdit { name: "kiwi".to_string(), custom_serving_size: 75.0 },
                ],
            },
        )
        .unwrap();
        assert_eq!(resp.applied, 1);
        assert_eq!(resp.ignored, 1);
        assert_eq!(session.catalog().get("oats").unwrap().custom_serving_size, 40.0);

        let bad = UpdateServingSizesRequest {
            edits: vec![ServingSizeEdit { name: "oats".to_string(), custom_serving_size: -1.0 }],
        };
        assert!(update_serving_sizes(&mut session, bad).is_err());
    }
}
