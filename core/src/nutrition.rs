//! Pure aggregation over the meal log. Nothing here touches state.

use std::ops::Add;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MealEntry, WATER_GOAL};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Macros {
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
        }
    }
}

impl Add for Macros {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
        }
    }
}

/// Meals logged on `date`, in log order.
pub fn meals_on(meals: &[MealEntry], date: NaiveDate) -> impl Iterator<Item = &MealEntry> {
    meals.iter().filter(move |m| m.date == date)
}

#[must_use]
pub fn daily_calories(meals: &[MealEntry], date: NaiveDate) -> f64 {
    meals_on(meals, date).map(MealEntry::total_calories).sum()
}

#[must_use]
pub fn daily_macros(meals: &[MealEntry], date: NaiveDate) -> Macros {
    meals_on(meals, date)
        .map(MealEntry::total_macros)
        .fold(Macros::default(), Add::add)
}

/// Share of the goal eaten, capped at 100. A zero goal reports 0.
#[must_use]
pub fn calorie_progress_percent(daily_calories: f64, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (daily_calories / f64::from(goal) * 100.0).clamp(0.0, 100.0)
}

#[must_use]
pub fn water_progress_percent(water_intake: u32) -> f64 {
    (f64::from(water_intake) / f64::from(WATER_GOAL) * 100.0).min(100.0)
}

/// Calories left before hitting the goal; negative once over.
#[must_use]
pub fn remaining_calories(daily_calories: f64, goal: u32) -> f64 {
    f64::from(goal) - daily_calories
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::{MealId, MealInput, MealType};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn meal(id: i64, day: &str, input: MealInput) -> MealEntry {
        input
            .validate()
            .unwrap()
            .into_entry(MealId(id), date(day), DateTime::<Utc>::UNIX_EPOCH)
    }

    fn sample_log() -> Vec<MealEntry> {
        vec![
            meal(
                1,
                "2024-06-15",
                MealInput::new("Oatmeal", 166.0, MealType::Breakfast)
                    .with_macros(6.0, 28.0, 3.6, 4.0)
                    .with_quantity(2.0),
            ),
            meal(
                2,
                "2024-06-15",
                MealInput::new("Apple", 95.0, MealType::Snack).with_macros(0.5, 25.0, 0.3, 4.4),
            ),
            meal(
                3,
                "2024-06-14",
                MealInput::new("Beef", 250.0, MealType::Dinner).with_macros(26.0, 0.0, 17.0, 0.0),
            ),
        ]
    }

    #[test]
    fn test_daily_calories_only_counts_matching_date() {
        let log = sample_log();
        // 166 * 2 + 95 = 427
        assert!((daily_calories(&log, date("2024-06-15")) - 427.0).abs() < 0.001);
        assert!((daily_calories(&log, date("2024-06-14")) - 250.0).abs() < 0.001);
        assert!(daily_calories(&log, date("2024-06-13")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_macros_scale_by_quantity() {
        let macros = daily_macros(&sample_log(), date("2024-06-15"));
        assert!((macros.protein - 12.5).abs() < 0.001);
        assert!((macros.carbs - 81.0).abs() < 0.001);
        assert!((macros.fat - 7.5).abs() < 0.001);
        assert!((macros.fiber - 12.4).abs() < 0.001);
    }

    #[test]
    fn test_daily_macros_empty_day() {
        assert_eq!(daily_macros(&[], date("2024-06-15")), Macros::default());
    }

    #[test]
    fn test_calorie_progress_is_capped() {
        assert!((calorie_progress_percent(500.0, 2000) - 25.0).abs() < f64::EPSILON);
        assert!((calorie_progress_percent(2000.0, 2000) - 100.0).abs() < f64::EPSILON);
        assert!((calorie_progress_percent(1_000_000.0, 2000) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calorie_progress_zero_goal() {
        assert!(calorie_progress_percent(800.0, 0).abs() < f64::EPSILON);
        assert!(calorie_progress_percent(0.0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_water_progress() {
        assert!(water_progress_percent(0).abs() < f64::EPSILON);
        assert!((water_progress_percent(500) - 25.0).abs() < f64::EPSILON);
        assert!((water_progress_percent(4000) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remaining_calories_goes_negative() {
        assert!((remaining_calories(1500.0, 2000) - 500.0).abs() < f64::EPSILON);
        assert!((remaining_calories(2300.0, 2000) + 300.0).abs() < f64::EPSILON);
    }
}
