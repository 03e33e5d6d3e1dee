use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::nutrition::Macros;

pub const DEFAULT_DAILY_GOAL: u32 = 2000;
pub const WATER_INCREMENT: u32 = 250;
pub const WATER_MAX: u32 = 4000;
pub const WATER_GOAL: u32 = 2000;
pub const WEIGHT_LOG_CAP: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(pub i64);

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    #[serde(alias = "breakfast")]
    Breakfast,
    #[serde(alias = "lunch")]
    Lunch,
    #[serde(alias = "dinner")]
    Dinner,
    #[serde(alias = "snack")]
    Snack,
}

pub const MEAL_TYPES: [MealType; 4] = [
    MealType::Breakfast,
    MealType::Lunch,
    MealType::Dinner,
    MealType::Snack,
];

impl MealType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MEAL_TYPES
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = MEAL_TYPES.iter().map(|t| t.as_str()).collect();
                TrackerError::validation(format!(
                    "Invalid meal type '{s}'. Must be one of: {}",
                    names.join(", ")
                ))
            })
    }
}

/// One logged food consumption event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: MealId,
    pub name: String,
    pub calories: f64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub date: NaiveDate,
    #[serde(rename = "timestamp", default = "epoch")]
    pub created_at: DateTime<Utc>,
}

impl MealEntry {
    /// Calories for the whole serving, i.e. scaled by quantity.
    #[must_use]
    pub fn total_calories(&self) -> f64 {
        self.calories * self.quantity
    }

    /// Macros for the whole serving.
    #[must_use]
    pub fn total_macros(&self) -> Macros {
        Macros {
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
        }
        .scaled(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default = "epoch")]
    pub timestamp: DateTime<Utc>,
}

/// Reference data from the built-in food table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoodItem {
    pub name: &'static str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

/// Values submitted by a meal form. Optional fields fall back to their
/// defaults (macros 0, quantity 1) once validated.
#[derive(Debug, Clone, PartialEq)]
pub struct MealInput {
    pub name: String,
    pub calories: f64,
    pub meal_type: MealType,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub quantity: Option<f64>,
}

impl MealInput {
    pub fn new(name: impl Into<String>, calories: f64, meal_type: MealType) -> Self {
        Self {
            name: name.into(),
            calories,
            meal_type,
            protein: None,
            carbs: None,
            fat: None,
            fiber: None,
            quantity: None,
        }
    }

    #[must_use]
    pub fn with_macros(mut self, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        self.protein = Some(protein);
        self.carbs = Some(carbs);
        self.fat = Some(fat);
        self.fiber = Some(fiber);
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Pre-fill a form from a food table entry.
    #[must_use]
    pub fn from_food(food: &FoodItem, meal_type: MealType) -> Self {
        Self::new(food.name, food.calories, meal_type).with_macros(
            food.protein,
            food.carbs,
            food.fat,
            food.fiber,
        )
    }

    /// The values an edit form shows for an existing entry.
    #[must_use]
    pub fn from_entry(entry: &MealEntry) -> Self {
        Self::new(entry.name.clone(), entry.calories, entry.meal_type)
            .with_macros(entry.protein, entry.carbs, entry.fat, entry.fiber)
            .with_quantity(entry.quantity)
    }

    pub fn validate(&self) -> Result<ValidatedMeal, TrackerError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TrackerError::validation("Meal name must not be empty"));
        }
        if !self.calories.is_finite() || self.calories <= 0.0 {
            return Err(TrackerError::validation("Calories must be greater than 0"));
        }
        let protein = non_negative("protein", self.protein)?;
        let carbs = non_negative("carbs", self.carbs)?;
        let fat = non_negative("fat", self.fat)?;
        let fiber = non_negative("fiber", self.fiber)?;
        let quantity = match self.quantity {
            None => 1.0,
            Some(q) if q.is_finite() && q > 0.0 => q,
            Some(_) => {
                return Err(TrackerError::validation("Quantity must be greater than 0"));
            }
        };
        Ok(ValidatedMeal {
            name: name.to_string(),
            calories: self.calories,
            meal_type: self.meal_type,
            protein,
            carbs,
            fat,
            fiber,
            quantity,
        })
    }
}

fn non_negative(field: &str, value: Option<f64>) -> Result<f64, TrackerError> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(TrackerError::validation(format!(
            "{field} must not be negative"
        ))),
    }
}

/// A meal input that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMeal {
    pub name: String,
    pub calories: f64,
    pub meal_type: MealType,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub quantity: f64,
}

impl ValidatedMeal {
    #[must_use]
    pub fn into_entry(self, id: MealId, date: NaiveDate, created_at: DateTime<Utc>) -> MealEntry {
        MealEntry {
            id,
            name: self.name,
            calories: self.calories,
            meal_type: self.meal_type,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            quantity: self.quantity,
            date,
            created_at,
        }
    }

    /// Overwrite an existing entry's fields, keeping its id and creation time.
    pub fn apply_to(self, entry: &mut MealEntry, date: NaiveDate) {
        let id = entry.id;
        let created_at = entry.created_at;
        *entry = self.into_entry(id, date, created_at);
    }
}

/// The persisted document. Transient UI state never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub meals: Vec<MealEntry>,
    pub water_intake: u32,
    pub weight_log: Vec<WeightEntry>,
    pub daily_goal: u32,
    pub selected_date: NaiveDate,
}

impl Snapshot {
    #[must_use]
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            meals: Vec::new(),
            water_intake: 0,
            weight_log: Vec::new(),
            daily_goal: DEFAULT_DAILY_GOAL,
            selected_date: today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub meals: Vec<MealEntry>,
    pub water_intake: u32,
    pub weight_log: Vec<WeightEntry>,
    pub daily_goal: u32,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    /// Suggested download name, e.g. `health-tracker-data-2024-06-15.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "health-tracker-data-{}.json",
            self.export_date.date_naive().format("%Y-%m-%d")
        )
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// An import document as read from disk. Every top-level field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub water_intake: u32,
    #[serde(default)]
    pub weight_log: Vec<WeightEntry>,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

impl ImportDocument {
    pub fn parse(raw: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(raw).map_err(|e| TrackerError::import(e.to_string()))
    }

    /// Check every record and normalize the collections so the result can
    /// replace tracker data wholesale.
    pub fn into_validated(self) -> Result<ImportedData, TrackerError> {
        let mut seen_ids = HashSet::new();
        for meal in &self.meals {
            validate_imported_meal(meal)?;
            if !seen_ids.insert(meal.id) {
                return Err(TrackerError::import(format!(
                    "duplicate meal id {}",
                    meal.id
                )));
            }
        }

        let mut seen_dates = HashSet::new();
        let mut weight_log = Vec::with_capacity(self.weight_log.len().min(WEIGHT_LOG_CAP));
        for entry in self.weight_log {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(TrackerError::import(format!(
                    "weight for {} must be greater than 0",
                    entry.date
                )));
            }
            if seen_dates.insert(entry.date) {
                weight_log.push(entry);
            }
        }
        weight_log.truncate(WEIGHT_LOG_CAP);

        Ok(ImportedData {
            meals: self.meals,
            water_intake: self.water_intake.min(WATER_MAX),
            weight_log,
            daily_goal: self.daily_goal,
        })
    }
}

fn validate_imported_meal(meal: &MealEntry) -> Result<(), TrackerError> {
    let input = MealInput::from_entry(meal);
    input
        .validate()
        .map(|_| ())
        .map_err(|e| match e {
            TrackerError::Validation(msg) => {
                TrackerError::import(format!("meal {}: {msg}", meal.id))
            }
            other => other,
        })
}

/// Tracker data accepted by an import, ready to replace current state.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    pub meals: Vec<MealEntry>,
    pub water_intake: u32,
    pub weight_log: Vec<WeightEntry>,
    pub daily_goal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub meals_imported: usize,
    pub weight_entries_imported: usize,
    pub water_intake: u32,
    pub daily_goal: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

/// A short-lived message for the user; expires on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

fn default_quantity() -> f64 {
    1.0
}

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_meal_type_parse_case_insensitive() {
        assert_eq!("lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!("BREAKFAST".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert_eq!(" Snack ".parse::<MealType>().unwrap(), MealType::Snack);
    }

    #[test]
    fn test_meal_type_parse_invalid() {
        assert!("brunch".parse::<MealType>().is_err());
        assert!("".parse::<MealType>().is_err());
    }

    #[test]
    fn test_meal_type_serializes_capitalized() {
        let json = serde_json::to_string(&MealType::Dinner).unwrap();
        assert_eq!(json, "\"Dinner\"");
        let parsed: MealType = serde_json::from_str("\"snack\"").unwrap();
        assert_eq!(parsed, MealType::Snack);
    }

    #[test]
    fn test_validate_applies_defaults() {
        let meal = MealInput::new("  Apple ", 95.0, MealType::Breakfast)
            .validate()
            .unwrap();
        assert_eq!(meal.name, "Apple");
        assert!((meal.quantity - 1.0).abs() < f64::EPSILON);
        assert!(meal.protein.abs() < f64::EPSILON);
        assert!(meal.fiber.abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(MealInput::new("", 100.0, MealType::Lunch).validate().is_err());
        assert!(MealInput::new("   ", 100.0, MealType::Lunch).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_calories() {
        assert!(MealInput::new("Toast", 0.0, MealType::Lunch).validate().is_err());
        assert!(MealInput::new("Toast", -5.0, MealType::Lunch).validate().is_err());
        assert!(MealInput::new("Toast", f64::NAN, MealType::Lunch).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_quantity_and_macros() {
        let zero_qty = MealInput::new("Toast", 80.0, MealType::Lunch).with_quantity(0.0);
        assert!(zero_qty.validate().is_err());
        let neg_fat =
            MealInput::new("Toast", 80.0, MealType::Lunch).with_macros(1.0, 1.0, -1.0, 0.0);
        assert!(neg_fat.validate().is_err());
    }

    #[test]
    fn test_apply_to_keeps_identity() {
        let created = DateTime::parse_from_rfc3339("2024-06-15T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut entry = MealInput::new("Apple", 95.0, MealType::Breakfast)
            .validate()
            .unwrap()
            .into_entry(MealId(7), date("2024-06-15"), created);

        MealInput::new("Banana", 105.0, MealType::Snack)
            .with_quantity(2.0)
            .validate()
            .unwrap()
            .apply_to(&mut entry, date("2024-06-16"));

        assert_eq!(entry.id, MealId(7));
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.name, "Banana");
        assert_eq!(entry.date, date("2024-06-16"));
        assert!((entry.total_calories() - 210.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_meal_entry_json_shape() {
        let json = r#"{"id":1718438400000,"name":"Apple","calories":95,"type":"Breakfast",
            "date":"2024-06-15","timestamp":"2024-06-15T08:00:00.000Z"}"#;
        let entry: MealEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, MealId(1_718_438_400_000));
        assert!((entry.quantity - 1.0).abs() < f64::EPSILON);
        assert!(entry.protein.abs() < f64::EPSILON);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "Breakfast");
        assert_eq!(value["date"], "2024-06-15");
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_import_document_defaults() {
        let doc = ImportDocument::parse("{}").unwrap().into_validated().unwrap();
        assert!(doc.meals.is_empty());
        assert!(doc.weight_log.is_empty());
        assert_eq!(doc.water_intake, 0);
        assert_eq!(doc.daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_import_document_rejects_malformed_json() {
        assert!(matches!(
            ImportDocument::parse("{not json"),
            Err(TrackerError::ImportParse(_))
        ));
        assert!(matches!(
            ImportDocument::parse(r#"{"waterIntake": -10}"#),
            Err(TrackerError::ImportParse(_))
        ));
    }

    #[test]
    fn test_import_document_rejects_invalid_meal() {
        let raw = r#"{"meals":[{"id":1,"name":"","calories":100,"type":"Lunch","date":"2024-06-15"}]}"#;
        let err = ImportDocument::parse(raw).unwrap().into_validated().unwrap_err();
        assert!(matches!(err, TrackerError::ImportParse(_)));
    }

    #[test]
    fn test_import_document_rejects_duplicate_ids() {
        let raw = r#"{"meals":[
            {"id":1,"name":"A","calories":100,"type":"Lunch","date":"2024-06-15"},
            {"id":1,"name":"B","calories":100,"type":"Lunch","date":"2024-06-15"}]}"#;
        assert!(ImportDocument::parse(raw).unwrap().into_validated().is_err());
    }

    #[test]
    fn test_import_document_normalizes_weights_and_water() {
        let raw = r#"{"waterIntake": 9000, "weightLog":[
            {"date":"2024-06-15","weight":80.5},
            {"date":"2024-06-15","weight":81.0},
            {"date":"2024-06-14","weight":81.2}]}"#;
        let data = ImportDocument::parse(raw).unwrap().into_validated().unwrap();
        assert_eq!(data.water_intake, WATER_MAX);
        assert_eq!(data.weight_log.len(), 2);
        assert!((data.weight_log[0].weight - 80.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_import_document_rejects_zero_weight() {
        let raw = r#"{"weightLog":[{"date":"2024-06-15","weight":0}]}"#;
        assert!(ImportDocument::parse(raw).unwrap().into_validated().is_err());
    }

    #[test]
    fn test_export_file_name() {
        let doc = ExportDocument {
            meals: Vec::new(),
            water_intake: 0,
            weight_log: Vec::new(),
            daily_goal: 2000,
            export_date: DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(doc.file_name(), "health-tracker-data-2024-06-15.json");
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains("\"exportDate\""));
        assert!(json.contains("\"weightLog\""));
    }
}
