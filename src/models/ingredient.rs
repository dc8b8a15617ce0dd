//! Ingredient catalog model
//!
//! Nutrition facts per reference serving, keyed by ingredient name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Nutrient, Nutrition, UserProfile};

/// Nutrition facts for one catalog ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIngredientFact")]
pub struct IngredientFact {
    /// Nutrient amounts per reference serving
    pub nutrition: Nutrition,
    /// Baseline amount (grams) the nutrition facts are recorded for; always > 0
    pub reference_serving_size: f64,
    /// Amount the user last chose for this ingredient
    pub custom_serving_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Deserialize)]
struct RawIngredientFact {
    nutrition: Nutrition,
    reference_serving_size: f64,
    #[serde(default)]
    custom_serving_size: Option<f64>,
    #[serde(default)]
    image: Option<String>,
}

impl TryFrom<RawIngredientFact> for IngredientFact {
    type Error = String;

    fn try_from(raw: RawIngredientFact) -> Result<Self, Self::Error> {
        if !(raw.reference_serving_size.is_finite() && raw.reference_serving_size > 0.0) {
            return Err(format!(
                "reference_serving_size must be positive, got {}",
                raw.reference_serving_size
            ));
        }
        if !raw.nutrition.is_non_negative() {
            return Err("nutrition values must be non-negative".to_string());
        }
        let custom_serving_size = match raw.custom_serving_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(size) => return Err(format!("custom_serving_size must be positive, got {}", size)),
            None => raw.reference_serving_size,
        };
        Ok(Self {
            nutrition: raw.nutrition,
            reference_serving_size: raw.reference_serving_size,
            custom_serving_size,
            image: raw.image,
        })
    }
}

impl IngredientFact {
    pub fn new(nutrition: Nutrition, reference_serving_size: f64) -> Self {
        Self {
            nutrition,
            reference_serving_size,
            custom_serving_size: reference_serving_size,
            image: None,
        }
    }

    /// Linear scaling factor for an amount relative to the reference serving
    pub fn multiplier(&self, amount: f64) -> f64 {
        amount / self.reference_serving_size
    }

    /// Nutrition contained in `amount` grams of this ingredient
    pub fn nutrition_for(&self, amount: f64) -> Nutrition {
        self.nutrition.scale(self.multiplier(amount))
    }

    /// Nutrition at the current custom serving size
    pub fn custom_nutrition(&self) -> Nutrition {
        self.nutrition_for(self.custom_serving_size)
    }
}

/// A requested change to one ingredient's custom serving size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomServingEdit {
    pub name: String,
    pub custom_serving_size: f64,
}

/// Sort orders offered when browsing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Alphabetical,
    /// Most servings logged in the active day first
    Frequency,
    /// Highest reference protein first
    Protein,
    /// Highest reference carbohydrate first
    Carbohydrate,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Alphabetical => "alphabetical",
            SortOrder::Frequency => "frequency",
            SortOrder::Protein => "protein",
            SortOrder::Carbohydrate => "carbohydrate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "alphabetical" | "name" => Some(SortOrder::Alphabetical),
            "frequency" => Some(SortOrder::Frequency),
            "protein" => Some(SortOrder::Protein),
            "carbohydrate" | "carbs" => Some(SortOrder::Carbohydrate),
            _ => None,
        }
    }
}

/// The full set of known ingredients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, IngredientFact>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&IngredientFact> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, fact: IngredientFact) {
        self.entries.insert(name.into(), fact);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IngredientFact)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite custom serving sizes; edits for unknown names are ignored.
    ///
    /// Returns the number of entries changed.
    pub fn apply_custom_serving_sizes(&mut self, edits: &[CustomServingEdit]) -> usize {
        let mut applied = 0;
        for edit in edits {
            if let Some(fact) = self.entries.get_mut(&edit.name) {
                fact.custom_serving_size = edit.custom_serving_size;
                applied += 1;
            }
        }
        applied
    }

    /// Case-insensitive substring search on the ingredient name
    pub fn search(&self, query: &str) -> Vec<(&str, &IngredientFact)> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|(name, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Catalog key whose display name is `display`, else the snake_case guess
    pub fn key_for_display_name(&self, display: &str) -> String {
        let display = display.trim();
        self.entries
            .keys()
            .find(|key| display_name(key) == display)
            .cloned()
            .unwrap_or_else(|| key_from_display_name(display))
    }

    /// Search and order the results
    pub fn browse(&self, query: &str, order: SortOrder, profile: &UserProfile) -> Vec<(&str, &IngredientFact)> {
        let mut items = self.search(query);
        sort_ingredients(&mut items, order, profile);
        items
    }
}

/// Order ingredients in place; ties always fall back to the name.
pub fn sort_ingredients(items: &mut [(&str, &IngredientFact)], order: SortOrder, profile: &UserProfile) {
    match order {
        SortOrder::Alphabetical => items.sort_by(|a, b| a.0.cmp(b.0)),
        SortOrder::Frequency => items.sort_by(|a, b| {
            profile
                .servings_of(b.0)
                .cmp(&profile.servings_of(a.0))
                .then_with(|| a.0.cmp(b.0))
        }),
        SortOrder::Protein => sort_by_nutrient(items, Nutrient::Protein),
        SortOrder::Carbohydrate => sort_by_nutrient(items, Nutrient::Carbohydrate),
    }
}

fn sort_by_nutrient(items: &mut [(&str, &IngredientFact)], nutrient: Nutrient) {
    items.sort_by(|a, b| {
        b.1.nutrition
            .get(nutrient)
            .total_cmp(&a.1.nutrition.get(nutrient))
            .then_with(|| a.0.cmp(b.0))
    });
}

/// "chicken_breast" -> "Chicken Breast"
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// "Chicken Breast" -> "chicken_breast"
pub fn key_from_display_name(display: &str) -> String {
    display.trim().to_lowercase().replace(' ', "_")
}
