//! Consumed selection
//!
//! Ingredients picked in the current session, waiting to be committed.

use std::collections::BTreeMap;

use serde::Serialize;

use super::CustomServingEdit;

/// Set of (ingredient, amount) pairs keyed by ingredient name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConsumedSelection {
    entries: BTreeMap<String, f64>,
}

impl ConsumedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingredient; returns false (and changes nothing) if already selected
    pub fn add(&mut self, name: &str, amount: f64) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), amount);
        true
    }

    /// Remove an ingredient; returns false if it was not selected
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Change the amount of an already selected ingredient
    pub fn set_amount(&mut self, name: &str, amount: f64) -> bool {
        match self.entries.get_mut(name) {
            Some(slot) => {
                *slot = amount;
                true
            }
            None => false,
        }
    }

    pub fn amount(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Amounts as catalog serving-size edits
    pub fn serving_edits(&self) -> Vec<CustomServingEdit> {
        self.iter()
            .map(|(name, amount)| CustomServingEdit {
                name: name.to_string(),
                custom_serving_size: amount,
            })
            .collect()
    }
}
