//! Runtime configuration
//!
//! Paths and defaults shared by the stores and the session. Built once at
//! startup and handed to whoever needs it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Nutrient, Nutrition};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Ingredient catalog JSON
    pub catalog_path: PathBuf,
    /// Active profile JSON
    pub profile_path: PathBuf,
    /// Where daily CSV logs are written and merged from
    pub log_dir: PathBuf,
    /// Where merged reports are written
    pub report_dir: PathBuf,
    /// Goals for a new log when none are given
    pub default_goals: Nutrition,
    pub default_weight: f64,
}

/// Optional overrides read from `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    catalog_path: Option<PathBuf>,
    profile_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    default_weight: Option<f64>,
    #[serde(default)]
    goals: GoalsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoalsSection {
    protein: Option<f64>,
    carbohydrate: Option<f64>,
    fat: Option<f64>,
    calories: Option<f64>,
}

impl GoalsSection {
    fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Carbohydrate => self.carbohydrate,
            Nutrient::Fat => self.fat,
            Nutrient::Calories => self.calories,
        }
    }
}

impl Config {
    /// Defaults rooted at `data_dir`
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let log_dir = data_dir.join("nutrition_logs");
        Self {
            catalog_path: data_dir.join("ingredients.json"),
            profile_path: data_dir.join("user_config.json"),
            report_dir: log_dir.clone(),
            log_dir,
            default_goals: Nutrition::new(200.0, 350.0, 70.0, 2000.0),
            default_weight: 70.0,
            data_dir,
        }
    }

    /// Resolve from the environment.
    ///
    /// `NUTRIFLOW_DATA_DIR` picks the data directory; `NUTRIFLOW_CONFIG` or
    /// `<data_dir>/config.toml` (if present) supplies overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::with_data_dir(default_data_dir());
        match std::env::var_os("NUTRIFLOW_CONFIG") {
            Some(path) => config.merge_file(Path::new(&path)),
            None => {
                let path = config.data_dir.join("config.toml");
                if path.is_file() {
                    config.merge_file(&path)
                } else {
                    Ok(config)
                }
            }
        }
    }

    /// Apply overrides from a TOML file
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply(file)
    }

    /// Apply overrides from TOML text
    pub fn merge_str(self, text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        self.apply(file)
    }

    fn apply(mut self, file: ConfigFile) -> Result<Self, ConfigError> {
        let resolve = |p: PathBuf| if p.is_relative() { self.data_dir.join(p) } else { p };

        let catalog_path = file.catalog_path.map(resolve);
        let profile_path = file.profile_path.map(resolve);
        let log_dir = file.log_dir.map(resolve);
        let report_dir = file.report_dir.map(resolve);

        if let Some(p) = catalog_path {
            self.catalog_path = p;
        }
        if let Some(p) = profile_path {
            self.profile_path = p;
        }
        if let Some(p) = log_dir {
            // Reports follow the log directory unless set explicitly
            if self.report_dir == self.log_dir {
                self.report_dir = p.clone();
            }
            self.log_dir = p;
        }
        if let Some(p) = report_dir {
            self.report_dir = p;
        }

        if let Some(weight) = file.default_weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ConfigError::Invalid(format!("default_weight must be positive, got {}", weight)));
            }
            self.default_weight = weight;
        }
        for nutrient in Nutrient::ALL {
            if let Some(goal) = file.goals.get(nutrient) {
                if !(goal.is_finite() && goal > 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "goals.{} must be positive, got {}",
                        nutrient.key(),
                        goal
                    )));
                }
                self.default_goals.set(nutrient, goal);
            }
        }
        Ok(self)
    }
}

/// `NUTRIFLOW_DATA_DIR`, else `data/` at the project root
pub fn default_data_dir() -> PathBuf {
    std::env::var("NUTRIFLOW_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(Path::parent) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::with_data_dir("/srv/nutri");
        assert_eq!(config.catalog_path, PathBuf::from("/srv/nutri/ingredients.json"));
        assert_eq!(config.profile_path, PathBuf::from("/srv/nutri/user_config.json"));
        assert_eq!(config.log_dir, PathBuf::from("/srv/nutri/nutrition_logs"));
        assert_eq!(config.report_dir, config.log_dir);
        assert_eq!(config.default_goals.calories, 2000.0);
    }

    #[test]
    fn test_overrides_resolve_relative_paths() {
        let config = Config::with_data_dir("/srv/nutri")
            .merge_str(
                r#"
                log_dir = "logs"
                catalog_path = "/opt/catalog.json"
                default_weight = 82.0

                [goals]
                protein = 160
                "#,
            )
            .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/srv/nutri/logs"));
        assert_eq!(config.report_dir, PathBuf::from("/srv/nutri/logs"));
        assert_eq!(config.catalog_path, PathBuf::from("/opt/catalog.json"));
        assert_eq!(config.default_weight, 82.0);
        assert_eq!(config.default_goals.protein, 160.0);
        assert_eq!(config.default_goals.fat, 70.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = Config::with_data_dir("/srv/nutri");
        assert!(matches!(
            base.clone().merge_str("[goals]\ncalories = -5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(base.merge_str("colour = \"blue\""), Err(ConfigError::Parse { .. })));
    }
}
