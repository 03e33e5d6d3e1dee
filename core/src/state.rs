use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    ImportedData, MealEntry, MealId, Notification, Snapshot, WATER_INCREMENT, WATER_MAX,
    WEIGHT_LOG_CAP, WeightEntry,
};
use crate::storage::LateLoad;

/// Everything the tracker knows. Owned by the controller; other components
/// only see it through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub(crate) meals: Vec<MealEntry>,
    pub(crate) weight_log: Vec<WeightEntry>,
    pub(crate) water_intake: u32,
    pub(crate) daily_goal: u32,
    pub(crate) selected_date: NaiveDate,
    pub(crate) editing: Option<MealId>,
    pub(crate) notification: Option<Notification>,
}

impl TrackerState {
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            meals: snapshot.meals,
            weight_log: snapshot.weight_log,
            water_intake: snapshot.water_intake.min(WATER_MAX),
            daily_goal: snapshot.daily_goal,
            selected_date: snapshot.selected_date,
            editing: None,
            notification: None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            meals: self.meals.clone(),
            water_intake: self.water_intake,
            weight_log: self.weight_log.clone(),
            daily_goal: self.daily_goal,
            selected_date: self.selected_date,
        }
    }

    /// Most recent first.
    #[must_use]
    pub fn meals(&self) -> &[MealEntry] {
        &self.meals
    }

    /// Most recent first, at most 30 entries.
    #[must_use]
    pub fn weight_log(&self) -> &[WeightEntry] {
        &self.weight_log
    }

    #[must_use]
    pub fn water_intake(&self) -> u32 {
        self.water_intake
    }

    #[must_use]
    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    #[must_use]
    pub fn editing(&self) -> Option<MealId> {
        self.editing
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    #[must_use]
    pub fn meal(&self, id: MealId) -> Option<&MealEntry> {
        self.meals.iter().find(|m| m.id == id)
    }

    pub(crate) fn meal_mut(&mut self, id: MealId) -> Option<&mut MealEntry> {
        self.meals.iter_mut().find(|m| m.id == id)
    }

    /// An id derived from `now` in epoch milliseconds, bumped past every id
    /// already in the log. Once the log holds `i64::MAX` the first free id
    /// from `now` on is used instead.
    pub(crate) fn next_meal_id(&self, now: DateTime<Utc>) -> MealId {
        let candidate = now.timestamp_millis();
        let Some(max) = self.meals.iter().map(|m| m.id.0).max() else {
            return MealId(candidate);
        };
        if let Some(next) = max.checked_add(1) {
            return MealId(candidate.max(next));
        }
        let free = (candidate..=i64::MAX)
            .chain(i64::MIN..candidate)
            .find(|id| self.meal(MealId(*id)).is_none())
            .unwrap_or(candidate);
        MealId(free)
    }

    pub(crate) fn remove_meal(&mut self, id: MealId) -> bool {
        let before = self.meals.len();
        self.meals.retain(|m| m.id != id);
        self.meals.len() != before
    }

    pub(crate) fn add_water(&mut self) {
        self.water_intake = self
            .water_intake
            .saturating_add(WATER_INCREMENT)
            .min(WATER_MAX);
    }

    /// Replace the entry for `entry.date`, keep the newest 30.
    pub(crate) fn record_weight(&mut self, entry: WeightEntry) {
        self.weight_log.retain(|w| w.date != entry.date);
        self.weight_log.insert(0, entry);
        self.weight_log.truncate(WEIGHT_LOG_CAP);
    }

    /// Fold what was recorded in memory into data read from storage after
    /// startup. Stored data is the base. Meals and weigh-ins from this
    /// session go on top, water adds up, and the goal and selected date keep
    /// the session's value only if it moved away from `fallback`.
    pub(crate) fn merge_late_load(&mut self, load: LateLoad) {
        let LateLoad { stored, fallback } = load;

        let session_meals = std::mem::replace(&mut self.meals, stored.meals);
        for mut meal in session_meals.into_iter().rev() {
            if self.meal(meal.id).is_some() {
                let id = self.next_meal_id(meal.created_at);
                if self.editing == Some(meal.id) {
                    self.editing = Some(id);
                }
                meal.id = id;
            }
            self.meals.insert(0, meal);
        }

        let session_weights = std::mem::replace(&mut self.weight_log, stored.weight_log);
        for entry in session_weights.into_iter().rev() {
            self.record_weight(entry);
        }

        self.water_intake = stored
            .water_intake
            .saturating_add(self.water_intake)
            .min(WATER_MAX);
        if self.daily_goal == fallback.daily_goal {
            self.daily_goal = stored.daily_goal;
        }
        if self.selected_date == fallback.selected_date {
            self.selected_date = stored.selected_date;
        }
    }

    pub(crate) fn replace_data(&mut self, data: ImportedData) {
        self.meals = data.meals;
        self.water_intake = data.water_intake;
        self.weight_log = data.weight_log;
        self.daily_goal = data.daily_goal;
        if self.editing.is_some_and(|id| self.meal(id).is_none()) {
            self.editing = None;
        }
    }
}
