use anyhow::Result;
use std::fmt::Write;

use nourish_core::TrackerController;
use nourish_core::budget::CalorieBudget;
use nourish_core::models::{MEAL_TYPES, WATER_GOAL};
use nourish_core::view::{Calendar, TrackerView};

use super::helpers::{format_quantity, no_neg_zero, print_json};

fn summary_text(view: &TrackerView) -> String {
    let mut out = String::new();
    let date = view.selected_date.format("%Y-%m-%d");
    let _ = writeln!(out, "=== {date} ===\n");

    if view.meals.is_empty() {
        let _ = writeln!(out, "  No meals logged\n");
    }
    for meal_type in MEAL_TYPES {
        let entries: Vec<_> = view.meals.iter().filter(|m| m.meal_type == meal_type).collect();
        if entries.is_empty() {
            continue;
        }
        let subtotal: f64 = entries.iter().map(|m| m.total_calories()).sum();
        let label = meal_type.as_str().to_uppercase();
        let _ = writeln!(out, "  {label} ({subtotal:.0} kcal)");
        for m in entries {
            let macros = m.total_macros();
            let _ = writeln!(
                out,
                "    [{}] {} x{} : {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g Fiber:{:.0}g",
                m.id,
                m.name,
                format_quantity(m.quantity),
                m.total_calories(),
                macros.protein,
                macros.carbs,
                macros.fat,
                macros.fiber
            );
        }
        let _ = writeln!(out);
    }

    let m = &view.macros;
    let _ = writeln!(
        out,
        "  TOTAL: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g Fiber:{:.0}g",
        view.daily_calories, m.protein, m.carbs, m.fat, m.fiber
    );
    let _ = writeln!(
        out,
        "  GOAL: {} kcal ({:.0}%)",
        view.daily_goal, view.calorie_progress
    );
    let _ = writeln!(
        out,
        "  REMAINING: {:.0} kcal",
        no_neg_zero(view.remaining_calories)
    );
    let _ = writeln!(
        out,
        "  WATER: {} / {WATER_GOAL} ml ({:.0}%)",
        view.water_intake, view.water_progress
    );
    let _ = writeln!(
        out,
        "  MEALS: {} today, {} total",
        view.meals_logged, view.total_meals
    );
    out
}

pub(crate) fn cmd_summary(controller: &TrackerController, json: bool) -> Result<()> {
    let view = controller.view();
    if json {
        return print_json(&view);
    }
    print!("{}", summary_text(&view));
    Ok(())
}

/// Sunday-first month grid. Days with meals are marked `*`, the selected
/// day is bracketed.
fn calendar_text(calendar: &Calendar) -> String {
    let mut out = String::new();
    let title = calendar
        .days
        .first()
        .map(|d| d.date.format("%B %Y").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{title:^35}");
    let _ = writeln!(out, " Sun  Mon  Tue  Wed  Thu  Fri  Sat");

    let mut column = 0;
    for _ in 0..calendar.leading_blanks {
        out.push_str("     ");
        column += 1;
    }
    for day in &calendar.days {
        let marker = if day.has_meals { '*' } else { ' ' };
        let cell = if day.is_selected {
            format!("[{:>2}]", day.day)
        } else {
            format!(" {:>2}{marker}", day.day)
        };
        let _ = write!(out, "{cell} ");
        column += 1;
        if column == 7 {
            out.truncate(out.trim_end().len());
            out.push('\n');
            column = 0;
        }
    }
    if column != 0 {
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

pub(crate) fn cmd_calendar(controller: &TrackerController, json: bool) -> Result<()> {
    let calendar = controller.view().calendar;
    if json {
        return print_json(&calendar);
    }
    print!("{}", calendar_text(&calendar));
    println!("\n  * meals logged   [ ] selected");
    Ok(())
}

pub(crate) fn cmd_label(controller: &TrackerController, json: bool) -> Result<()> {
    let label = controller.nutrition_label();
    if json {
        return print_json(&label);
    }
    print!("{}", label.render_text());
    Ok(())
}

fn budget_text(budget: &CalorieBudget) -> String {
    format!(
        "  {} Calories Budgeted\n  {} Calories Consumed\n  {} Calories Burned\n\n  {}\n",
        budget.budget,
        budget.consumed,
        budget.burned,
        budget.balance()
    )
}

pub(crate) fn cmd_budget(
    controller: &TrackerController,
    budget: i64,
    burned: i64,
    json: bool,
) -> Result<()> {
    let result = controller.calorie_budget(budget, burned);
    if json {
        return print_json(&serde_json::json!({
            "budget": result.budget,
            "consumed": result.consumed,
            "burned": result.burned,
            "net": result.net(),
            "balance": result.balance(),
        }));
    }
    print!("{}", budget_text(&result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};
    use nourish_core::models::{MealInput, MealType};
    use nourish_core::{ManualClock, MemoryStore, PersistenceGateway};

    use super::*;

    fn controller() -> TrackerController {
        let start = DateTime::parse_from_rfc3339("2024-02-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        TrackerController::new(
            PersistenceGateway::new(MemoryStore::new()),
            ManualClock::new(start),
        )
    }

    #[test]
    fn test_summary_text_groups_by_meal() {
        let mut c = controller();
        c.add_meal(&MealInput::new("Eggs", 150.0, MealType::Breakfast))
            .unwrap();
        c.add_meal(&MealInput::new("Toast", 80.0, MealType::Breakfast).with_quantity(2.0))
            .unwrap();
        c.add_meal(&MealInput::new("Soup", 300.0, MealType::Dinner))
            .unwrap();

        let text = summary_text(&c.view());
        assert!(text.contains("=== 2024-02-15 ==="));
        assert!(text.contains("BREAKFAST (310 kcal)"));
        assert!(text.contains("DINNER (300 kcal)"));
        assert!(!text.contains("LUNCH"));
        assert!(text.contains("TOTAL: 610 kcal"));
        assert!(text.contains("REMAINING: 1390 kcal"));
        assert!(text.contains("MEALS: 3 today, 3 total"));
    }

    #[test]
    fn test_summary_text_empty_day() {
        let text = summary_text(&controller().view());
        assert!(text.contains("No meals logged"));
        assert!(text.contains("GOAL: 2000 kcal (0%)"));
    }

    #[test]
    fn test_calendar_text() {
        let mut c = controller();
        c.add_meal(&MealInput::new("Soup", 300.0, MealType::Dinner))
            .unwrap();
        c.select_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let text = calendar_text(&c.view().calendar);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("February 2024"));
        // 2024-02-01 is a Thursday: four blank cells, then the selected day
        assert!(lines[2].starts_with(&" ".repeat(20)));
        assert!(lines[2].contains("[ 1]"));
        assert!(text.contains(" 15*"));
        assert!(text.contains(" 29"));
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn test_budget_text() {
        let mut c = controller();
        c.add_meal(&MealInput::new("Pasta", 900.0, MealType::Dinner))
            .unwrap();
        let text = budget_text(&c.calorie_budget(1500, 200));
        assert!(text.contains("1500 Calories Budgeted"));
        assert!(text.contains("900 Calories Consumed"));
        assert!(text.contains("800 Calories Remaining (Deficit)"));
    }
}
