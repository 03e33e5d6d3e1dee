//! The single owner of tracker state. Every mutation goes through
//! [`TrackerController`], which persists the result, raises a notification
//! and tells subscribers what kind of change happened.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::budget::CalorieBudget;
use crate::catalog;
use crate::clock::Clock;
use crate::error::TrackerError;
use crate::label::NutritionLabel;
use crate::models::{
    ExportDocument, FoodItem, ImportDocument, ImportSummary, MealId, MealInput, MealType,
    Notification, NotificationId, NotificationKind, WeightEntry,
};
use crate::nutrition;
use crate::state::TrackerState;
use crate::storage::PersistenceGateway;
use crate::view::{TrackerView, build_view};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL_MS: i64 = 3000;

const STORAGE_UNAVAILABLE: &str = "Storage unavailable, changes are kept in memory only";

/// What a subscriber should re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Persisted data changed.
    Data,
    /// Only transient state changed: the editing pointer or a notification.
    Ui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Change)>;

struct PlannedMeal {
    name: &'static str,
    meal_type: MealType,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
}

impl PlannedMeal {
    fn input(&self) -> MealInput {
        MealInput::new(self.name, self.calories, self.meal_type).with_macros(
            self.protein,
            self.carbs,
            self.fat,
            self.fiber,
        )
    }
}

const MEAL_PLAN: [PlannedMeal; 4] = [
    PlannedMeal {
        name: "Oatmeal with fruits",
        meal_type: MealType::Breakfast,
        calories: 350.0,
        protein: 12.0,
        carbs: 60.0,
        fat: 6.0,
        fiber: 8.0,
    },
    PlannedMeal {
        name: "Grilled Chicken Salad",
        meal_type: MealType::Lunch,
        calories: 450.0,
        protein: 35.0,
        carbs: 20.0,
        fat: 15.0,
        fiber: 6.0,
    },
    PlannedMeal {
        name: "Salmon with vegetables",
        meal_type: MealType::Dinner,
        calories: 500.0,
        protein: 40.0,
        carbs: 25.0,
        fat: 20.0,
        fiber: 8.0,
    },
    PlannedMeal {
        name: "Greek Yogurt with nuts",
        meal_type: MealType::Snack,
        calories: 200.0,
        protein: 15.0,
        carbs: 12.0,
        fat: 10.0,
        fiber: 2.0,
    },
];

pub struct TrackerController {
    state: TrackerState,
    gateway: PersistenceGateway,
    clock: Box<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    next_notification: u64,
    pending_clear: Option<(NotificationId, DateTime<Utc>)>,
}

impl TrackerController {
    /// Load the stored snapshot, falling back to defaults for `clock.today()`.
    pub fn new(mut gateway: PersistenceGateway, clock: impl Clock + 'static) -> Self {
        let snapshot = gateway.load(clock.today());
        let mut controller = Self {
            state: TrackerState::from_snapshot(snapshot),
            gateway,
            clock: Box::new(clock),
            listeners: Vec::new(),
            next_subscription: 0,
            next_notification: 0,
            pending_clear: None,
        };
        if controller.gateway.is_degraded() {
            controller.notify(NotificationKind::Error, STORAGE_UNAVAILABLE);
        }
        controller
    }

    #[must_use]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    #[must_use]
    pub fn view(&self) -> TrackerView {
        build_view(&self.state, self.clock.now())
    }

    #[must_use]
    pub fn nutrition_label(&self) -> NutritionLabel {
        NutritionLabel::for_day(&self.state, self.state.selected_date())
    }

    /// Budget for the selected day, counting what has been eaten so far.
    #[must_use]
    pub fn calorie_budget(&self, budget: i64, burned: i64) -> CalorieBudget {
        let consumed =
            nutrition::daily_calories(self.state.meals(), self.state.selected_date()).round();
        CalorieBudget::new(budget, consumed as i64, burned)
    }

    #[must_use]
    pub fn search_foods(&self, query: &str) -> Vec<&'static FoodItem> {
        catalog::search(query)
    }

    #[must_use]
    pub fn is_storage_degraded(&self) -> bool {
        self.gateway.is_degraded()
    }

    // --- Meals ---

    /// Add a meal to the selected day, or overwrite the meal being edited.
    pub fn add_meal(&mut self, input: &MealInput) -> Result<MealId, TrackerError> {
        let meal = match input.validate() {
            Ok(meal) => meal,
            Err(err) => {
                debug!(%err, "rejected meal input");
                self.notify(
                    NotificationKind::Error,
                    "Please fill all fields with valid data",
                );
                self.emit(Change::Ui);
                return Err(err);
            }
        };

        let date = self.state.selected_date;
        let editing = self.state.editing.take();
        if let Some(entry) = editing.and_then(|id| self.state.meal_mut(id)) {
            let id = entry.id;
            meal.apply_to(entry, date);
            debug!(%id, %date, "meal updated");
            self.notify(NotificationKind::Success, "Meal updated successfully");
            self.commit();
            return Ok(id);
        }

        let now = self.clock.now();
        let id = self.state.next_meal_id(now);
        self.state.meals.insert(0, meal.into_entry(id, date, now));
        debug!(%id, %date, "meal added");
        self.notify(NotificationKind::Success, "Meal added successfully");
        self.commit();
        Ok(id)
    }

    /// Returns whether a meal was removed. Unknown ids are not an error.
    pub fn delete_meal(&mut self, id: MealId) -> bool {
        let removed = self.state.remove_meal(id);
        if self.state.editing == Some(id) {
            self.state.editing = None;
        }
        debug!(%id, removed, "meal deleted");
        self.notify(NotificationKind::Info, "Meal deleted");
        self.commit();
        removed
    }

    /// Point the editor at `id` and return the values the form should show.
    pub fn begin_edit_meal(&mut self, id: MealId) -> Option<MealInput> {
        let input = MealInput::from_entry(self.state.meal(id)?);
        self.state.editing = Some(id);
        self.emit(Change::Ui);
        Some(input)
    }

    pub fn cancel_edit(&mut self) {
        if self.state.editing.take().is_some() {
            self.emit(Change::Ui);
        }
    }

    /// Add the four template meals to the selected day.
    pub fn generate_meal_plan(&mut self) -> Vec<MealId> {
        self.state.editing = None;
        let ids: Vec<MealId> = MEAL_PLAN
            .iter()
            .filter_map(|planned| self.add_meal(&planned.input()).ok())
            .collect();
        debug!(count = ids.len(), "meal plan generated");
        self.notify(NotificationKind::Success, "Daily meal plan generated");
        self.emit(Change::Ui);
        ids
    }

    // --- Water, weight, goal ---

    pub fn add_water(&mut self) {
        self.state.add_water();
        debug!(water_intake = self.state.water_intake, "water added");
        self.notify(NotificationKind::Success, "Water intake added");
        self.commit();
    }

    pub fn reset_water(&mut self) {
        self.state.water_intake = 0;
        debug!("water reset");
        self.commit();
    }

    /// Record `weight` for the selected day, replacing any earlier entry for it.
    pub fn log_weight(&mut self, weight: f64) -> Result<(), TrackerError> {
        if !weight.is_finite() || weight <= 0.0 {
            self.notify(NotificationKind::Error, "Please enter a valid weight");
            self.emit(Change::Ui);
            return Err(TrackerError::validation("Weight must be greater than 0"));
        }

        let date = self.state.selected_date;
        self.state.record_weight(WeightEntry {
            date,
            weight,
            timestamp: self.clock.now(),
        });
        debug!(%date, weight, "weight logged");
        self.notify(NotificationKind::Success, "Weight logged successfully");
        self.commit();
        Ok(())
    }

    /// Negative goals become 0.
    pub fn set_daily_goal(&mut self, goal: i64) {
        let goal = u32::try_from(goal.max(0)).unwrap_or(u32::MAX);
        self.state.daily_goal = goal;
        debug!(goal, "daily goal set");
        self.commit();
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.state.selected_date = date;
        debug!(%date, "date selected");
        self.commit();
    }

    // --- Transfer ---

    pub fn export_snapshot(&mut self) -> ExportDocument {
        let document = ExportDocument {
            meals: self.state.meals.clone(),
            water_intake: self.state.water_intake,
            weight_log: self.state.weight_log.clone(),
            daily_goal: self.state.daily_goal,
            export_date: self.clock.now(),
        };
        debug!(meals = document.meals.len(), "data exported");
        self.notify(NotificationKind::Success, "Data exported successfully");
        self.emit(Change::Ui);
        document
    }

    /// Replace meals, water, weight log and goal with the document's contents.
    /// The selected date is kept. A rejected document changes nothing.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<ImportSummary, TrackerError> {
        let data = match ImportDocument::parse(raw).and_then(ImportDocument::into_validated) {
            Ok(data) => data,
            Err(err) => {
                debug!(%err, "import rejected");
                self.notify(NotificationKind::Error, "Invalid file format");
                self.emit(Change::Ui);
                return Err(err);
            }
        };

        let summary = ImportSummary {
            meals_imported: data.meals.len(),
            weight_entries_imported: data.weight_log.len(),
            water_intake: data.water_intake,
            daily_goal: data.daily_goal,
        };
        self.state.replace_data(data);
        debug!(?summary, "data imported");
        self.notify(NotificationKind::Success, "Data imported successfully");
        self.commit();
        Ok(summary)
    }

    // --- Subscriptions ---

    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // --- Notifications ---

    /// When [`poll_timers`](Self::poll_timers) next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending_clear.map(|(_, deadline)| deadline)
    }

    /// Clear the notification if its deadline has passed. Returns whether
    /// anything was cleared.
    pub fn poll_timers(&mut self) -> bool {
        let Some((id, deadline)) = self.pending_clear else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }

        self.pending_clear = None;
        if self.state.notification.as_ref().is_some_and(|n| n.id == id) {
            self.state.notification = None;
            self.emit(Change::Ui);
            return true;
        }
        false
    }

    pub fn dismiss_notification(&mut self) {
        self.pending_clear = None;
        if self.state.notification.take().is_some() {
            self.emit(Change::Ui);
        }
    }

    /// Replaces the current notification and supersedes its pending clear.
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        self.next_notification += 1;
        let id = NotificationId(self.next_notification);
        let expires_at = self.clock.now() + Duration::milliseconds(NOTIFICATION_TTL_MS);
        self.state.notification = Some(Notification {
            id,
            kind,
            message: message.to_string(),
            expires_at,
        });
        self.pending_clear = Some((id, expires_at));
    }

    fn emit(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    /// Persist and announce a data change. Storage failures never reach the
    /// caller; the first one in a row is surfaced as a notification. Stored
    /// data that could not be read at startup is merged in before writing.
    fn commit(&mut self) {
        let was_degraded = self.gateway.is_degraded();
        if let Some(late) = self.gateway.reload() {
            debug!(stored_meals = late.stored.meals.len(), "merging late-loaded data");
            self.state.merge_late_load(late);
        }
        if self.gateway.save(&self.state.snapshot()).is_err() && !was_degraded {
            self.notify(NotificationKind::Error, STORAGE_UNAVAILABLE);
        }
        self.emit(Change::Data);
    }
}
