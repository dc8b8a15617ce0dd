//! Session state
//!
//! The catalog, the active profile and the pending selection for one run.
//! Every mutating call finishes its file writes before it returns, and the
//! in-memory state only changes once those writes have succeeded.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{
    Catalog, ConsumedSelection, CustomServingEdit, IngredientFact, Nutrition, SortOrder, UserProfile,
};
use crate::nutrition::{compute_percentages, compute_totals, progress_report, ProgressRow};
use crate::store::{
    export_csv, import_csv, merge_logs, unique_path, CatalogStore, ProfileStore, ReportSummary,
    StoreError, StoreResult,
};

/// Result of committing the selection to the profile
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    /// Nutrition added by this commit
    pub added: Nutrition,
    /// Profile totals after the commit
    pub consumed_totals: Nutrition,
    pub ingredients: Vec<String>,
}

pub fn default_log_file_name(date: NaiveDate) -> String {
    format!("nutrition_log_{}.csv", date.format("%Y-%m-%d"))
}

pub struct Session {
    config: Config,
    catalog_store: CatalogStore,
    profile_store: ProfileStore,
    catalog: Catalog,
    profile: UserProfile,
    selection: ConsumedSelection,
}

impl Session {
    /// Load the catalog and the profile.
    ///
    /// A missing profile document starts a fresh log dated `today` and writes it.
    pub fn open(config: Config, today: NaiveDate) -> StoreResult<Self> {
        let catalog_store = CatalogStore::new(&config.catalog_path);
        let profile_store = ProfileStore::new(&config.profile_path);

        let catalog = catalog_store.load()?;
        let profile = if profile_store.exists() {
            profile_store.load_json()?
        } else {
            let profile = UserProfile::new(
                today,
                config.default_weight,
                config.log_dir.join(default_log_file_name(today)),
                config.default_goals,
            );
            profile_store.write_json(&profile)?;
            info!(path = %profile_store.path().display(), "Started a new profile");
            profile
        };

        info!(ingredients = catalog.len(), date = %profile.date, "Session opened");
        Ok(Self {
            config,
            catalog_store,
            profile_store,
            catalog,
            profile,
            selection: ConsumedSelection::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn selection(&self) -> &ConsumedSelection {
        &self.selection
    }

    pub fn ingredient(&self, name: &str) -> StoreResult<&IngredientFact> {
        self.catalog
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn browse(&self, query: &str, order: SortOrder) -> Vec<(&str, &IngredientFact)> {
        self.catalog.browse(query, order, &self.profile)
    }

    // --- Selection ---

    /// Select an ingredient; `amount` defaults to its custom serving size.
    ///
    /// Returns false if it was already selected.
    pub fn select(&mut self, name: &str, amount: Option<f64>) -> StoreResult<bool> {
        let fact = self.ingredient(name)?;
        let amount = amount.unwrap_or(fact.custom_serving_size);
        Ok(self.selection.add(name, amount))
    }

    pub fn deselect(&mut self, name: &str) -> bool {
        self.selection.remove(name)
    }

    pub fn set_selection_amount(&mut self, name: &str, amount: f64) -> bool {
        self.selection.set_amount(name, amount)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_totals(&self) -> Nutrition {
        compute_totals(&self.selection, &self.catalog)
    }

    /// Record the selection in the profile, persist both documents, clear it.
    ///
    /// The catalog is written first. If the profile write then fails, the
    /// in-memory catalog matches the new file while the profile and the
    /// selection stay as they were, so the commit can be retried.
    pub fn commit_selection(&mut self) -> StoreResult<CommitOutcome> {
        let added = self.selection_totals();

        let mut catalog = self.catalog.clone();
        catalog.apply_custom_serving_sizes(&self.selection.serving_edits());

        let mut profile = self.profile.clone();
        let mut ingredients = Vec::new();
        for (name, amount) in self.selection.iter() {
            if self.catalog.contains(name) {
                profile.record(name, amount);
                ingredients.push(name.to_string());
            }
        }

        self.catalog_store.save(&catalog)?;
        self.catalog = catalog;

        profile.consumed_totals = self.profile_store.save_json(&profile, &added)?;
        self.profile = profile;
        self.selection.clear();

        info!(ingredients = ingredients.len(), "Intake committed");
        Ok(CommitOutcome {
            added,
            consumed_totals: self.profile.consumed_totals,
            ingredients,
        })
    }

    /// Change serving sizes outside of a commit
    pub fn apply_serving_sizes(&mut self, edits: &[CustomServingEdit]) -> StoreResult<usize> {
        let mut catalog = self.catalog.clone();
        let applied = catalog.apply_custom_serving_sizes(edits);
        if applied < edits.len() {
            warn!(ignored = edits.len() - applied, "Ignoring serving sizes for unknown ingredients");
        }
        self.catalog_store.save(&catalog)?;
        self.catalog = catalog;
        Ok(applied)
    }

    // --- Progress ---

    pub fn percentages(&self) -> Nutrition {
        compute_percentages(&self.profile.consumed_totals, &self.profile.goals)
    }

    pub fn progress(&self) -> Vec<ProgressRow> {
        progress_report(&self.profile)
    }

    // --- Logs ---

    /// Start a fresh all-zero log dated `today`.
    ///
    /// Writes the empty CSV to `path` (default: a new file under the log
    /// directory), then replaces the profile document.
    pub fn new_log(
        &mut self,
        path: Option<PathBuf>,
        weight: Option<f64>,
        goals: Option<Nutrition>,
        today: NaiveDate,
    ) -> StoreResult<PathBuf> {
        let path = path.unwrap_or_else(|| unique_path(&self.config.log_dir, &default_log_file_name(today)));
        let profile = UserProfile::new(
            today,
            weight.unwrap_or(self.config.default_weight),
            path.clone(),
            goals.unwrap_or(self.config.default_goals),
        );

        let percentages = compute_percentages(&profile.consumed_totals, &profile.goals);
        export_csv(&profile, &percentages, &path)?;
        self.profile_store.write_json(&profile)?;

        self.profile = profile;
        self.selection.clear();
        info!(path = %path.display(), "New log created");
        Ok(path)
    }

    /// Replace the active profile with one read from a CSV log
    pub fn import_log(&mut self, path: &Path) -> StoreResult<()> {
        let profile = import_csv(path, &self.catalog)?;
        self.profile_store.write_json(&profile)?;
        self.profile = profile;
        self.selection.clear();
        info!(path = %path.display(), "Log imported");
        Ok(())
    }

    /// Write the active profile to CSV
    pub fn export_log(&self, path: Option<PathBuf>, today: NaiveDate) -> StoreResult<PathBuf> {
        let path = path.unwrap_or_else(|| unique_path(&self.config.log_dir, &default_log_file_name(today)));
        export_csv(&self.profile, &self.percentages(), &path)?;
        Ok(path)
    }

    pub fn generate_report(&self, date: NaiveDate) -> StoreResult<ReportSummary> {
        merge_logs(&self.config.log_dir, &self.config.report_dir, date)
    }
}
