//! Progress toward daily goals

use serde::Serialize;

use super::aggregator::{percent_of_goal, progress_percent};
use crate::models::{round2, Nutrient, UserProfile};

/// One nutrient's standing against its goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRow {
    pub nutrient: Nutrient,
    pub goal: f64,
    pub consumed: f64,
    /// Shown next to the numbers; may exceed 100
    pub label_percent: f64,
    /// Bar fill, clamped to 0..=100
    pub progress_percent: f64,
    pub goal_label: String,
    pub consumed_label: String,
}

pub fn progress_report(profile: &UserProfile) -> Vec<ProgressRow> {
    Nutrient::ALL
        .iter()
        .map(|&nutrient| {
            let goal = profile.goals.get(nutrient);
            let consumed = round2(profile.consumed_totals.get(nutrient));
            let label_percent = percent_of_goal(consumed, goal);
            ProgressRow {
                nutrient,
                goal,
                consumed,
                label_percent,
                progress_percent: progress_percent(consumed, goal),
                goal_label: format!("{} Goal: {}{}", nutrient.label(), goal, nutrient.unit()),
                consumed_label: format!("Consumed: {}{} | {}%", consumed, nutrient.unit(), label_percent),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;
    use chrono::NaiveDate;

    #[test]
    fn test_progress_report_labels() {
        let mut profile = UserProfile::new(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            70.0,
            "log.csv".into(),
            Nutrition::new(200.0, 350.0, 70.0, 2000.0),
        );
        profile.consumed_totals = Nutrition::new(250.0, 35.0, 0.0, 500.0);

        let rows = progress_report(&profile);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].nutrient, Nutrient::Protein);
        assert_eq!(rows[0].label_percent, 125.0);
        assert_eq!(rows[0].progress_percent, 100.0);
        assert_eq!(rows[0].goal_label, "Protein Goal: 200g");
        assert_eq!(rows[0].consumed_label, "Consumed: 250g | 125%");
        assert_eq!(rows[1].label_percent, 10.0);
        assert_eq!(rows[3].goal_label, "Calories Goal: 2000kcal");
    }
}
