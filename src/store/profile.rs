//! User profile document
//!
//! `{ date, weight, log_path, goals, consumed_totals, consumed_ingredients }`.
//! `consumed_totals` uses the `consumed_*` keys; any other keys already in the
//! file are carried through untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{write_document, StoreError, StoreResult};
use crate::models::{Nutrient, Nutrition, UserProfile};

#[derive(Debug, Serialize, Deserialize)]
struct ProfileDocument {
    date: NaiveDate,
    weight: f64,
    log_path: PathBuf,
    goals: Map<String, Value>,
    consumed_totals: Map<String, Value>,
    consumed_ingredients: BTreeMap<String, Vec<f64>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ProfileDocument {
    fn from_profile(profile: &UserProfile, consumed_totals: Map<String, Value>, extra: Map<String, Value>) -> Self {
        Self {
            date: profile.date,
            weight: profile.weight,
            log_path: profile.log_path.clone(),
            goals: goals_map(&profile.goals),
            consumed_totals,
            consumed_ingredients: profile.consumed_ingredients.clone(),
            extra,
        }
    }
}

fn goals_map(goals: &Nutrition) -> Map<String, Value> {
    Nutrient::ALL
        .iter()
        .map(|k| (k.key().to_string(), Value::from(goals.get(*k))))
        .collect()
}

fn stored_total(totals: &Map<String, Value>, nutrient: Nutrient) -> Option<f64> {
    totals.get(nutrient.consumed_key()).and_then(Value::as_f64)
}

fn set_total(totals: &mut Map<String, Value>, nutrient: Nutrient, value: f64) {
    totals.insert(nutrient.consumed_key().to_string(), Value::from(value));
}

/// Reads and writes the profile JSON file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_document(&self) -> StoreResult<ProfileDocument> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::format(&self.path, e))
    }

    pub fn load_json(&self) -> StoreResult<UserProfile> {
        let doc = self.read_document()?;

        let mut goals = Nutrition::zero();
        for nutrient in Nutrient::ALL {
            let goal = doc.goals.get(nutrient.key()).and_then(Value::as_f64);
            match goal {
                Some(goal) if goal.is_finite() && goal > 0.0 => goals.set(nutrient, goal),
                Some(goal) => {
                    return Err(StoreError::format(
                        &self.path,
                        format!("goals.{} must be positive, got {}", nutrient.key(), goal),
                    ))
                }
                None => {
                    return Err(StoreError::format(
                        &self.path,
                        format!("goals.{} is missing or not a number", nutrient.key()),
                    ))
                }
            }
        }

        let mut consumed_totals = Nutrition::zero();
        for nutrient in Nutrient::ALL {
            let value = match doc.consumed_totals.get(nutrient.consumed_key()) {
                None => 0.0,
                Some(v) => v.as_f64().ok_or_else(|| {
                    StoreError::format(
                        &self.path,
                        format!("{} is not a number", nutrient.consumed_key()),
                    )
                })?,
            };
            consumed_totals.set(nutrient, value);
        }

        debug!(path = %self.path.display(), date = %doc.date, "Loaded profile");
        Ok(UserProfile {
            date: doc.date,
            weight: doc.weight,
            log_path: doc.log_path,
            goals,
            consumed_totals,
            consumed_ingredients: doc.consumed_ingredients,
        })
    }

    /// Write the profile, adding `increment` onto the stored consumed totals.
    ///
    /// For each nutrient: stored = stored + increment. Every other field is
    /// taken from `profile`. Returns the totals now on disk.
    pub fn save_json(&self, profile: &UserProfile, increment: &Nutrition) -> StoreResult<Nutrition> {
        let (mut totals, extra) = match self.read_document() {
            Ok(doc) => (doc.consumed_totals, doc.extra),
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                (Map::new(), Map::new())
            }
            Err(e) => return Err(e),
        };

        let mut merged = Nutrition::zero();
        for nutrient in Nutrient::ALL {
            let value = stored_total(&totals, nutrient).unwrap_or(0.0) + increment.get(nutrient);
            set_total(&mut totals, nutrient, value);
            merged.set(nutrient, value);
        }

        self.write(&ProfileDocument::from_profile(profile, totals, extra))?;
        info!(path = %self.path.display(), "Profile saved");
        Ok(merged)
    }

    /// Replace the whole document, totals included
    pub fn write_json(&self, profile: &UserProfile) -> StoreResult<()> {
        let mut totals = Map::new();
        for nutrient in Nutrient::ALL {
            set_total(&mut totals, nutrient, profile.consumed_totals.get(nutrient));
        }
        self.write(&ProfileDocument::from_profile(profile, totals, Map::new()))?;
        info!(path = %self.path.display(), date = %profile.date, "Profile replaced");
        Ok(())
    }

    fn write(&self, doc: &ProfileDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(doc).map_err(|e| StoreError::format(&self.path, e))?;
        write_document(&self.path, json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile() -> UserProfile {
        let mut p = UserProfile::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            72.5,
            PathBuf::from("nutrition_logs/nutrition_log_2024-01-01.csv"),
            Nutrition::new(180.0, 300.0, 70.0, 2200.0),
        );
        p.record("chicken_breast", 150.0);
        p
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("user_config.json"));
        let mut p = profile();
        p.consumed_totals = Nutrition::new(46.5, 0.0, 5.4, 247.5);
        store.write_json(&p).unwrap();
        assert_eq!(store.load_json().unwrap(), p);
    }

    #[test]
    fn test_save_merges_totals_additively() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_config.json");
        fs::write(
            &path,
            r#"{"date": "2024-01-01", "weight": 70, "log_path": "a.csv",
                "goals": {"protein": 200, "carbohydrate": 350, "fat": 70, "calories": 2000},
                "consumed_totals": {"consumed_protein": 10, "note": "kept"},
                "consumed_ingredients": {},
                "theme": "dark"}"#,
        )
        .unwrap();

        let store = ProfileStore::new(&path);
        let merged = store
            .save_json(&profile(), &Nutrition::new(5.0, 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(merged.protein, 15.0);

        let loaded = store.load_json().unwrap();
        assert_eq!(loaded.consumed_totals.protein, 15.0);
        assert_eq!(loaded.weight, 72.5);
        assert_eq!(loaded.consumed_ingredients["chicken_breast"], vec![150.0]);

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["consumed_totals"]["note"], "kept");
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_save_without_existing_file_starts_from_zero() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("fresh").join("user_config.json"));
        let merged = store
            .save_json(&profile(), &Nutrition::new(46.5, 0.0, 5.4, 247.5))
            .unwrap();
        assert_eq!(merged, Nutrition::new(46.5, 0.0, 5.4, 247.5));
        assert!(store.exists());
    }

    #[test]
    fn test_missing_required_key_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_config.json");
        fs::write(&path, r#"{"date": "2024-01-01", "weight": 70}"#).unwrap();
        let store = ProfileStore::new(&path);
        assert!(matches!(store.load_json(), Err(StoreError::Format { .. })));
    }

    #[test]
    fn test_missing_or_zero_goal_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_config.json");
        let store = ProfileStore::new(&path);
        let document = |goals: &str| {
            format!(
                r#"{{"date": "2024-01-01", "weight": 70, "log_path": "a.csv", "goals": {},
                    "consumed_totals": {{}}, "consumed_ingredients": {{}}}}"#,
                goals
            )
        };

        fs::write(&path, document("{}")).unwrap();
        assert!(matches!(store.load_json(), Err(StoreError::Format { .. })));

        fs::write(&path, document(r#"{"protein": 200, "carbohydrate": 350, "fat": 0, "calories": 2000}"#)).unwrap();
        assert!(matches!(store.load_json(), Err(StoreError::Format { .. })));

        fs::write(&path, document(r#"{"protein": 200, "carbohydrate": 350, "fat": 70, "calories": 2000}"#)).unwrap();
        assert_eq!(store.load_json().unwrap().goals, Nutrition::new(200.0, 350.0, 70.0, 2000.0));
    }
}
