//! Printable "Nutrition Facts" style summary for one day.
//!
//! Saturated fat, cholesterol, sodium and sugars are not tracked per meal;
//! they are rough estimates derived from the tracked macros.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::nutrition;
use crate::state::TrackerState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRow {
    pub name: &'static str,
    pub amount: f64,
    pub unit: &'static str,
    pub daily_value_percent: Option<i64>,
    pub indent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionLabel {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub calories: f64,
    pub rows: Vec<LabelRow>,
}

fn percent_of(amount: f64, daily_value: f64) -> i64 {
    (amount / daily_value * 100.0).round() as i64
}

fn row(name: &'static str, amount: f64, unit: &'static str, daily_value: Option<f64>) -> LabelRow {
    LabelRow {
        name,
        amount,
        unit,
        daily_value_percent: daily_value.map(|dv| percent_of(amount, dv)),
        indent: false,
    }
}

fn indented(mut row: LabelRow) -> LabelRow {
    row.indent = true;
    row
}

impl NutritionLabel {
    #[must_use]
    pub fn for_day(state: &TrackerState, date: NaiveDate) -> Self {
        let meals = state.meals();
        let calories = nutrition::daily_calories(meals, date);
        let macros = nutrition::daily_macros(meals, date);
        let sodium = calories * 0.001;

        let rows = vec![
            row("Total Fat", macros.fat, "g", Some(78.0)),
            indented(row("Saturated Fat", macros.fat * 0.3, "g", Some(20.0))),
            row("Cholesterol", macros.fat * 0.2, "mg", Some(300.0)),
            row("Sodium", sodium, "mg", Some(2300.0)),
            row("Total Carbohydrate", macros.carbs, "g", Some(275.0)),
            indented(row("Dietary Fiber", macros.fiber, "g", Some(28.0))),
            indented(row("Total Sugars", macros.carbs * 0.2, "g", None)),
            row("Protein", macros.protein, "g", Some(50.0)),
        ];

        Self {
            date,
            meal_count: nutrition::meals_on(meals, date).count(),
            calories,
            rows,
        }
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        const WIDTH: usize = 40;
        let thick = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);

        let mut out = String::new();
        let _ = writeln!(out, "{:^WIDTH$}", "Nutrition Facts");
        let _ = writeln!(out, "{thick}");
        let _ = writeln!(out, "Daily Summary for {}", self.date.format("%Y-%m-%d"));
        let _ = writeln!(out, "Total Servings: {} meals", self.meal_count);
        let _ = writeln!(out, "{thick}");
        let _ = writeln!(out, "Amount per Day");
        let _ = writeln!(out, "{:<28}{:>12.0}", "Calories", self.calories);
        let _ = writeln!(out, "{thick}");
        let _ = writeln!(out, "{:>WIDTH$}", "% Daily Value *");
        for r in &self.rows {
            let name = if r.indent {
                format!("  {}", r.name)
            } else {
                r.name.to_string()
            };
            let amount = format!("{:.1}{}", r.amount, r.unit);
            let dv = r
                .daily_value_percent
                .map(|p| format!("{p}%"))
                .unwrap_or_default();
            let _ = writeln!(out, "{name:<22}{amount:>10}{dv:>8}");
            let _ = writeln!(out, "{thin}");
        }
        let _ = writeln!(
            out,
            "* The % Daily Value (DV) tells you how much a nutrient in a\n  day of food contributes to a daily diet. 2,000 calories a\n  day is used for general nutrition advice."
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::{MealId, MealInput, MealType, Snapshot};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state_with_meals() -> TrackerState {
        let mut snapshot = Snapshot::empty(date("2024-06-15"));
        snapshot.meals = vec![
            MealInput::new("Salmon with vegetables", 500.0, MealType::Dinner)
                .with_macros(40.0, 25.0, 20.0, 8.0)
                .validate()
                .unwrap()
                .into_entry(MealId(1), date("2024-06-15"), DateTime::<Utc>::UNIX_EPOCH),
        ];
        TrackerState::from_snapshot(snapshot)
    }

    #[test]
    fn test_label_estimates() {
        let label = NutritionLabel::for_day(&state_with_meals(), date("2024-06-15"));
        assert_eq!(label.meal_count, 1);
        assert!((label.calories - 500.0).abs() < f64::EPSILON);

        let fat = &label.rows[0];
        assert!((fat.amount - 20.0).abs() < f64::EPSILON);
        // 20 / 78 = 25.6%
        assert_eq!(fat.daily_value_percent, Some(26));

        let saturated = &label.rows[1];
        assert!(saturated.indent);
        assert!((saturated.amount - 6.0).abs() < 1e-9);
        assert_eq!(saturated.daily_value_percent, Some(30));

        let protein = label.rows.last().unwrap();
        assert_eq!(protein.daily_value_percent, Some(80));

        let sugars = label.rows.iter().find(|r| r.name == "Total Sugars").unwrap();
        assert!(sugars.daily_value_percent.is_none());
    }

    #[test]
    fn test_label_empty_day() {
        let label = NutritionLabel::for_day(&state_with_meals(), date("2024-06-16"));
        assert_eq!(label.meal_count, 0);
        assert!(
            label
                .rows
                .iter()
                .all(|r| r.daily_value_percent.unwrap_or(0) == 0)
        );
    }

    #[test]
    fn test_render_text_contains_rows() {
        let text = NutritionLabel::for_day(&state_with_meals(), date("2024-06-15")).render_text();
        assert!(text.contains("Nutrition Facts"));
        assert!(text.contains("Daily Summary for 2024-06-15"));
        assert!(text.contains("Total Fat"));
        assert!(text.contains("20.0g"));
        assert!(text.contains("26%"));
    }
}
