use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nourish_core::models::{FoodItem, MealEntry, Notification, NotificationKind};

pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    match date_str {
        "today" => Ok(today),
        "yesterday" => Ok(today - chrono::Duration::days(1)),
        "tomorrow" => Ok(today + chrono::Duration::days(1)),
        _ => NaiveDate::parse_from_str(date_str, "%Y-%m-%d").with_context(|| {
            format!("Invalid date '{date_str}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
        }),
    }
}

/// Print the tracker's current notification. Errors go to stderr.
pub(crate) fn print_notification(notification: Option<&Notification>) {
    let Some(n) = notification else {
        return;
    };
    match n.kind {
        NotificationKind::Error => eprintln!("{}", n.message),
        NotificationKind::Success | NotificationKind::Info => println!("{}", n.message),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn meal_table(meals: &[&MealEntry]) -> String {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        meal_type: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Qty")]
        quantity: String,
        #[tabled(rename = "kcal")]
        calories: String,
        #[tabled(rename = "P")]
        protein: String,
        #[tabled(rename = "C")]
        carbs: String,
        #[tabled(rename = "F")]
        fat: String,
        #[tabled(rename = "Fiber")]
        fiber: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| {
            let macros = m.total_macros();
            MealRow {
                id: m.id.0,
                date: m.date.format("%Y-%m-%d").to_string(),
                meal_type: m.meal_type.to_string(),
                name: truncate(&m.name, 30),
                quantity: format_quantity(m.quantity),
                calories: format!("{:.0}", m.total_calories()),
                protein: format!("{:.1}", macros.protein),
                carbs: format!("{:.1}", macros.carbs),
                fat: format!("{:.1}", macros.fat),
                fiber: format!("{:.1}", macros.fiber),
            }
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..10)).with(Alignment::right()))
        .to_string()
}

pub(crate) fn food_table(foods: &[&FoodItem]) -> String {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "Name")]
        name: &'static str,
        #[tabled(rename = "kcal")]
        calories: String,
        #[tabled(rename = "P")]
        protein: String,
        #[tabled(rename = "C")]
        carbs: String,
        #[tabled(rename = "F")]
        fat: String,
        #[tabled(rename = "Fiber")]
        fiber: String,
    }

    let rows: Vec<FoodRow> = foods
        .iter()
        .map(|f| FoodRow {
            name: f.name,
            calories: format!("{:.0}", f.calories),
            protein: format!("{:.1}", f.protein),
            carbs: format!("{:.1}", f.carbs),
            fat: format!("{:.1}", f.fat),
            fiber: format!("{:.1}", f.fiber),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..6)).with(Alignment::right()))
        .to_string()
}

/// `1` for whole quantities, `1.5` otherwise.
pub(crate) fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use nourish_core::models::{MealId, MealInput, MealType};

    use super::*;

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert_eq!(
            parse_date("yesterday").unwrap(),
            today - chrono::Duration::days(1)
        );
        assert_eq!(
            parse_date("tomorrow").unwrap(),
            today + chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("nope").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1.0), "1");
        assert_eq!(format_quantity(2.5), "2.5");
    }

    #[test]
    fn test_meal_table_shows_totals() {
        let meal = MealInput::new("Banana", 105.0, MealType::Snack)
            .with_quantity(2.0)
            .validate()
            .unwrap()
            .into_entry(
                MealId(7),
                NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                DateTime::<Utc>::UNIX_EPOCH,
            );
        let table = meal_table(&[&meal]);
        assert!(table.contains("Banana"));
        assert!(table.contains("210"));
        assert!(table.contains("Snack"));
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("nope"), r#"{"error":"nope"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert!((no_neg_zero(-3.0) + 3.0).abs() < f64::EPSILON);
    }
}
