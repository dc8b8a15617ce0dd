//! User profile model
//!
//! The active day's log: goals, body weight and what has been eaten so far.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use super::{Catalog, Nutrition};

/// Daily log state for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub date: NaiveDate,
    pub weight: f64, // kg
    /// Where this log is persisted as CSV
    pub log_path: PathBuf,
    pub goals: Nutrition,
    /// Cumulative amounts, updated on each committed selection
    pub consumed_totals: Nutrition,
    /// Amount history per ingredient; one entry per committed serving
    pub consumed_ingredients: BTreeMap<String, Vec<f64>>,
}

impl UserProfile {
    /// A fresh log with nothing consumed
    pub fn new(date: NaiveDate, weight: f64, log_path: PathBuf, goals: Nutrition) -> Self {
        Self {
            date,
            weight,
            log_path,
            goals,
            consumed_totals: Nutrition::zero(),
            consumed_ingredients: BTreeMap::new(),
        }
    }

    /// Append one serving to an ingredient's history
    pub fn record(&mut self, name: &str, amount: f64) {
        self.consumed_ingredients
            .entry(name.to_string())
            .or_default()
            .push(amount);
    }

    /// Number of servings of an ingredient logged today
    pub fn servings_of(&self, name: &str) -> usize {
        self.consumed_ingredients.get(name).map_or(0, Vec::len)
    }

    /// Totals rebuilt from the ingredient history and current catalog facts.
    ///
    /// Ingredients missing from the catalog contribute nothing.
    #[cfg(test)]
    pub(crate) fn derived_totals(&self, catalog: &Catalog) -> Nutrition {
        self.consumed_ingredients
            .iter()
            .filter_map(|(name, amounts)| catalog.get(name).map(|fact| (fact, amounts)))
            .flat_map(|(fact, amounts)| amounts.iter().map(move |a| fact.nutrition_for(*a)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientFact;

    #[test]
    fn test_record_keeps_history() {
        let mut profile = UserProfile::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            80.0,
            PathBuf::from("log.csv"),
            Nutrition::new(150.0, 250.0, 60.0, 2200.0),
        );
        profile.record("oats", 40.0);
        profile.record("oats", 60.0);
        assert_eq!(profile.consumed_ingredients["oats"], vec![40.0, 60.0]);
        assert_eq!(profile.servings_of("oats"), 2);
        assert_eq!(profile.servings_of("banana"), 0);
    }

    #[test]
    fn test_derived_totals() {
        let mut catalog = Catalog::new();
        catalog.insert("oats", IngredientFact::new(Nutrition::new(13.0, 67.0, 7.0, 379.0), 100.0));
        let mut profile = UserProfile::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            80.0,
            PathBuf::from("log.csv"),
            Nutrition::zero(),
        );
        profile.record("oats", 50.0);
        profile.record("oats", 50.0);
        profile.record("unknown", 500.0);

        let totals = profile.derived_totals(&catalog);
        assert!((totals.protein - 13.0).abs() < 0.001);
        assert!((totals.calories - 379.0).abs() < 0.001);
    }
}
