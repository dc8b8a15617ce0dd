//! Nutrition aggregation
//!
//! Pure functions over a selection, the catalog and the profile goals.

use crate::models::{round2, Catalog, ConsumedSelection, Nutrient, Nutrition};

/// Sum of every selected ingredient scaled to its selected amount.
///
/// scaled = reference value * (amount / reference_serving_size). The sum is
/// rounded to 2 decimals and that rounded figure is what gets committed.
/// Names missing from the catalog are skipped.
pub fn compute_totals(selection: &ConsumedSelection, catalog: &Catalog) -> Nutrition {
    let total: Nutrition = selection
        .iter()
        .filter_map(|(name, amount)| catalog.get(name).map(|fact| fact.nutrition_for(amount)))
        .sum();
    total.round2()
}

/// Percent of goal as shown in labels and exported logs; no upper bound
pub fn percent_of_goal(consumed: f64, goal: f64) -> f64 {
    if goal > 0.0 {
        round2(consumed / goal * 100.0)
    } else {
        0.0
    }
}

/// Percent used to fill a progress bar; always within [0, 100]
pub fn progress_percent(consumed: f64, goal: f64) -> f64 {
    if goal > 0.0 {
        (round2(consumed) / goal * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Label percentages for all four nutrients
pub fn compute_percentages(consumed_totals: &Nutrition, goals: &Nutrition) -> Nutrition {
    Nutrition::from_fn(|k| percent_of_goal(consumed_totals.get(k), goals.get(k)))
}

/// Progress-bar percentages for all four nutrients
pub fn progress_percentages(consumed_totals: &Nutrition, goals: &Nutrition) -> Nutrition {
    Nutrition::from_fn(|k| progress_percent(consumed_totals.get(k), goals.get(k)))
}

/// "Protein: 46.5g | Carbohydrate: 0g | Fat: 5.4g"
pub fn format_selection_summary(totals: &Nutrition) -> String {
    [Nutrient::Protein, Nutrient::Carbohydrate, Nutrient::Fat]
        .iter()
        .map(|k| format!("{}: {}{}", k.label(), round2(totals.get(*k)), k.unit()))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientFact;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let mut chicken = IngredientFact::new(Nutrition::new(31.0, 0.0, 3.6, 165.0), 100.0);
        chicken.custom_serving_size = 150.0;
        catalog.insert("chicken_breast", chicken);
        catalog.insert("broccoli", IngredientFact::new(Nutrition::new(2.8, 7.0, 0.4, 34.0), 100.0));
        catalog.insert("olive_oil", IngredientFact::new(Nutrition::new(0.0, 0.0, 14.0, 119.0), 15.0));
        catalog
    }

    #[test]
    fn test_single_ingredient_totals() {
        let mut selection = ConsumedSelection::new();
        selection.add("chicken_breast", 150.0);
        let totals = compute_totals(&selection, &catalog());
        assert_eq!(totals, Nutrition::new(46.5, 0.0, 5.4, 247.5));
    }

    #[test]
    fn test_totals_independent_of_insertion_order() {
        let catalog = catalog();
        let mut a = ConsumedSelection::new();
        a.add("chicken_breast", 150.0);
        a.add("broccoli", 85.0);
        a.add("olive_oil", 7.5);
        let mut b = ConsumedSelection::new();
        b.add("olive_oil", 7.5);
        b.add("broccoli", 85.0);
        b.add("chicken_breast", 150.0);
        assert_eq!(compute_totals(&a, &catalog), compute_totals(&b, &catalog));
    }

    #[test]
    fn test_unknown_ingredient_skipped() {
        let mut selection = ConsumedSelection::new();
        selection.add("broccoli", 100.0);
        selection.add("unobtainium", 100.0);
        let totals = compute_totals(&selection, &catalog());
        assert_eq!(totals, Nutrition::new(2.8, 7.0, 0.4, 34.0));
    }

    #[test]
    fn test_zero_goal_gives_zero_percent() {
        assert_eq!(percent_of_goal(50.0, 0.0), 0.0);
        assert_eq!(progress_percent(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_label_unbounded_progress_clamped() {
        assert_eq!(percent_of_goal(300.0, 200.0), 150.0);
        assert_eq!(progress_percent(300.0, 200.0), 100.0);
        assert_eq!(progress_percent(-5.0, 200.0), 0.0);
        assert_eq!(percent_of_goal(46.5, 200.0), 23.25);
    }

    #[test]
    fn test_compute_percentages() {
        let consumed = Nutrition::new(100.0, 0.0, 140.0, 1000.0);
        let goals = Nutrition::new(200.0, 0.0, 70.0, 2000.0);
        assert_eq!(compute_percentages(&consumed, &goals), Nutrition::new(50.0, 0.0, 200.0, 50.0));
        assert_eq!(progress_percentages(&consumed, &goals), Nutrition::new(50.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_selection_summary() {
        let summary = format_selection_summary(&Nutrition::new(46.5, 0.0, 5.4, 247.5));
        assert_eq!(summary, "Protein: 46.5g | Carbohydrate: 0g | Fat: 5.4g");
    }
}
