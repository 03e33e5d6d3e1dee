//! Read-only data a presentation layer renders from. Rebuilt after every change.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{MealEntry, MealId, Notification, WeightEntry};
use crate::nutrition::{self, Macros};
use crate::state::TrackerState;

pub const WEIGHT_TREND_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerView {
    pub selected_date: NaiveDate,
    pub daily_calories: f64,
    pub macros: Macros,
    pub calorie_progress: f64,
    pub water_progress: f64,
    pub water_intake: u32,
    pub daily_goal: u32,
    pub remaining_calories: f64,
    pub meals: Vec<MealEntry>,
    pub meals_logged: usize,
    pub total_meals: usize,
    pub weight_trend: WeightTrend,
    pub calendar: Calendar,
    pub editing: Option<MealId>,
    pub notification: Option<Notification>,
}

/// The last few weigh-ins, oldest first, with the scale a chart needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrend {
    pub points: Vec<WeightEntry>,
    pub min: f64,
    pub max: f64,
}

impl WeightTrend {
    #[must_use]
    pub fn from_log(log: &[WeightEntry]) -> Self {
        let points: Vec<WeightEntry> = log.iter().take(WEIGHT_TREND_LEN).rev().cloned().collect();
        let min = points.iter().map(|p| p.weight).reduce(f64::min).unwrap_or(0.0);
        let max = points.iter().map(|p| p.weight).reduce(f64::max).unwrap_or(0.0);
        Self { points, min, max }
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first week grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub has_meals: bool,
    pub is_selected: bool,
}

impl Calendar {
    /// The month containing `selected`.
    #[must_use]
    pub fn for_month(selected: NaiveDate, meals: &[MealEntry]) -> Self {
        let first = selected.with_day(1).unwrap_or(selected);
        let days = first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .map(|date| CalendarDay {
                date,
                day: date.day(),
                has_meals: meals.iter().any(|m| m.date == date),
                is_selected: date == selected,
            })
            .collect();

        Self {
            year: first.year(),
            month: first.month(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        }
    }
}

#[must_use]
pub fn build_view(state: &TrackerState, now: DateTime<Utc>) -> TrackerView {
    let date = state.selected_date();
    let meals = state.meals();
    let daily_calories = nutrition::daily_calories(meals, date);
    let day_meals: Vec<MealEntry> = nutrition::meals_on(meals, date).cloned().collect();

    TrackerView {
        selected_date: date,
        daily_calories,
        macros: nutrition::daily_macros(meals, date),
        calorie_progress: nutrition::calorie_progress_percent(daily_calories, state.daily_goal()),
        water_progress: nutrition::water_progress_percent(state.water_intake()),
        water_intake: state.water_intake(),
        daily_goal: state.daily_goal(),
        remaining_calories: nutrition::remaining_calories(daily_calories, state.daily_goal()),
        meals_logged: day_meals.len(),
        meals: day_meals,
        total_meals: meals.len(),
        weight_trend: WeightTrend::from_log(state.weight_log()),
        calendar: Calendar::for_month(date, meals),
        editing: state.editing(),
        notification: state
            .notification()
            .filter(|n| n.expires_at > now)
            .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{MealInput, MealType, Snapshot};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weight(day: &str, kg: f64) -> WeightEntry {
        WeightEntry {
            date: date(day),
            weight: kg,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn meal(id: i64, day: &str, calories: f64) -> MealEntry {
        MealInput::new("Test", calories, MealType::Lunch)
            .validate()
            .unwrap()
            .into_entry(MealId(id), date(day), DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn test_weight_trend_oldest_first() {
        // log is most-recent-first
        let log: Vec<WeightEntry> = (0..10)
            .map(|i| weight(&format!("2024-06-{:02}", 20 - i), 80.0 - f64::from(i)))
            .collect();
        let trend = WeightTrend::from_log(&log);
        assert_eq!(trend.points.len(), WEIGHT_TREND_LEN);
        assert_eq!(trend.points[0].date, date("2024-06-14"));
        assert_eq!(trend.points[6].date, date("2024-06-20"));
        assert!((trend.min - 74.0).abs() < f64::EPSILON);
        assert!((trend.max - 80.0).abs() < f64::EPSILON);
        assert!((trend.range() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weight_trend_empty() {
        let trend = WeightTrend::from_log(&[]);
        assert!(trend.is_empty());
        assert!(trend.range().abs() < f64::EPSILON);
    }

    #[test]
    fn test_calendar_covers_month() {
        let meals = vec![meal(1, "2024-02-10", 300.0)];
        let cal = Calendar::for_month(date("2024-02-15"), &meals);
        assert_eq!(cal.year, 2024);
        assert_eq!(cal.month, 2);
        // leap year
        assert_eq!(cal.days.len(), 29);
        // 2024-02-01 was a Thursday
        assert_eq!(cal.leading_blanks, 4);
        assert!(cal.days[9].has_meals);
        assert!(!cal.days[10].has_meals);
        assert!(cal.days[14].is_selected);
        assert_eq!(cal.days.iter().filter(|d| d.is_selected).count(), 1);
    }

    #[test]
    fn test_build_view_selected_day() {
        let mut snapshot = Snapshot::empty(date("2024-06-15"));
        snapshot.meals = vec![
            meal(2, "2024-06-15", 500.0),
            meal(1, "2024-06-14", 700.0),
        ];
        snapshot.water_intake = 1000;
        let state = TrackerState::from_snapshot(snapshot);

        let view = build_view(&state, DateTime::<Utc>::UNIX_EPOCH);
        assert!((view.daily_calories - 500.0).abs() < f64::EPSILON);
        assert!((view.calorie_progress - 25.0).abs() < f64::EPSILON);
        assert!((view.water_progress - 50.0).abs() < f64::EPSILON);
        assert!((view.remaining_calories - 1500.0).abs() < f64::EPSILON);
        assert_eq!(view.meals_logged, 1);
        assert_eq!(view.total_meals, 2);
        assert_eq!(view.meals[0].id, MealId(2));
        assert!(view.notification.is_none());
    }

    #[test]
    fn test_build_view_hides_expired_notification() {
        let mut state = TrackerState::from_snapshot(Snapshot::empty(date("2024-06-15")));
        let now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(1);
        state.notification = Some(Notification {
            id: crate::models::NotificationId(1),
            kind: crate::models::NotificationKind::Info,
            message: "hi".to_string(),
            expires_at: now,
        });
        assert!(build_view(&state, now).notification.is_none());
        assert!(build_view(&state, now - Duration::milliseconds(1)).notification.is_some());
    }
}
