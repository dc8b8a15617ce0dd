//! Data models
//!
//! Plain Rust structs for the catalog, the daily profile and the selection.

mod ingredient;
mod nutrition;
mod profile;
mod selection;

pub use ingredient::{
    display_name, key_from_display_name, sort_ingredients, Catalog, CustomServingEdit,
    IngredientFact, SortOrder,
};
pub use nutrition::{round2, Nutrient, Nutrition};
pub use profile::UserProfile;
pub use selection::ConsumedSelection;
