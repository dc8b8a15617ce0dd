//! Shared nutrition data structure
//!
//! Used across the ingredient catalog, the daily profile, the aggregator and the
//! CSV log. The four tracked nutrients are named in one place: [`Nutrient`].

use serde::{Deserialize, Serialize};

/// One of the four tracked macro-nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Carbohydrate,
    Fat,
    Calories,
}

impl Nutrient {
    /// Column order used everywhere a row of nutrients is written
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Protein,
        Nutrient::Carbohydrate,
        Nutrient::Fat,
        Nutrient::Calories,
    ];

    /// Key in the catalog `nutrition` and profile `goals` mappings
    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::Protein => "protein",
            Nutrient::Carbohydrate => "carbohydrate",
            Nutrient::Fat => "fat",
            Nutrient::Calories => "calories",
        }
    }

    /// Key in the profile `consumed_totals` mapping
    pub fn consumed_key(&self) -> &'static str {
        match self {
            Nutrient::Protein => "consumed_protein",
            Nutrient::Carbohydrate => "consumed_carbohydrate",
            Nutrient::Fat => "consumed_fat",
            Nutrient::Calories => "consumed_calories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::Protein => "Protein",
            Nutrient::Carbohydrate => "Carbohydrate",
            Nutrient::Fat => "Fat",
            Nutrient::Calories => "Calories",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

/// Amounts of the four tracked nutrients
///
/// Field names match [`Nutrient::key`], so this serializes directly as the
/// catalog `nutrition` mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub protein: f64,      // grams
    #[serde(default)]
    pub carbohydrate: f64, // grams
    #[serde(default)]
    pub fat: f64,          // grams
    #[serde(default)]
    pub calories: f64,     // kcal
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(protein: f64, carbohydrate: f64, fat: f64, calories: f64) -> Self {
        Self { protein, carbohydrate, fat, calories }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Carbohydrate => self.carbohydrate,
            Nutrient::Fat => self.fat,
            Nutrient::Calories => self.calories,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::Protein => self.protein = value,
            Nutrient::Carbohydrate => self.carbohydrate = value,
            Nutrient::Fat => self.fat = value,
            Nutrient::Calories => self.calories = value,
        }
    }

    /// Build from a per-nutrient function, in [`Nutrient::ALL`] order
    pub fn from_fn<F: FnMut(Nutrient) -> f64>(mut f: F) -> Self {
        let mut n = Self::zero();
        for nutrient in Nutrient::ALL {
            n.set(nutrient, f(nutrient));
        }
        n
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self::from_fn(|k| self.get(k) * multiplier)
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self::from_fn(|k| self.get(k) + other.get(k))
    }

    /// Round every value to 2 decimal places
    pub fn round2(&self) -> Self {
        Self::from_fn(|k| round2(self.get(k)))
    }

    /// Values in [`Nutrient::ALL`] order
    pub fn values(&self) -> [f64; 4] {
        Nutrient::ALL.map(|k| self.get(k))
    }

    /// True when every value is finite and non-negative
    pub fn is_non_negative(&self) -> bool {
        self.values().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

/// Round to 2 decimal places, the precision used for display and storage
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
