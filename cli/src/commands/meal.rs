use anyhow::{Result, bail};
use std::process;

use nourish_core::TrackerController;
use nourish_core::catalog;
use nourish_core::models::{FoodItem, MealEntry, MealId, MealInput, MealType};

use super::helpers::{json_error, meal_table, print_json};
use super::report;

/// Meal values given on the command line. Anything left out keeps the
/// value it already had (or the food table's value for `--food`).
#[derive(Debug, Default)]
pub(crate) struct MealFields {
    pub name: Option<String>,
    pub food: Option<String>,
    pub calories: Option<f64>,
    pub meal_type: Option<String>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub quantity: Option<f64>,
}

impl MealFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.food.is_none()
            && self.calories.is_none()
            && self.meal_type.is_none()
            && self.protein.is_none()
            && self.carbs.is_none()
            && self.fat.is_none()
            && self.fiber.is_none()
            && self.quantity.is_none()
    }

    /// A fresh form: from the food table when `--food` is given, otherwise
    /// from `name` and `--calories`.
    fn into_new_input(self) -> Result<MealInput> {
        let meal_type = self.parse_meal_type()?.unwrap_or(MealType::Snack);
        let base = match (&self.food, &self.name, self.calories) {
            (Some(query), _, _) => MealInput::from_food(find_food(query)?, meal_type),
            (None, Some(name), Some(calories)) => MealInput::new(name.clone(), calories, meal_type),
            _ => bail!("Provide a meal name and --calories, or pick a food with --food"),
        };
        self.apply(base)
    }

    fn apply(self, mut input: MealInput) -> Result<MealInput> {
        if let Some(query) = &self.food {
            let food = find_food(query)?;
            input = MealInput::from_food(food, input.meal_type);
        }
        if let Some(meal_type) = self.parse_meal_type()? {
            input.meal_type = meal_type;
        }
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(calories) = self.calories {
            input.calories = calories;
        }
        input.protein = self.protein.or(input.protein);
        input.carbs = self.carbs.or(input.carbs);
        input.fat = self.fat.or(input.fat);
        input.fiber = self.fiber.or(input.fiber);
        input.quantity = self.quantity.or(input.quantity);
        Ok(input)
    }

    fn parse_meal_type(&self) -> Result<Option<MealType>> {
        Ok(self
            .meal_type
            .as_deref()
            .map(str::parse::<MealType>)
            .transpose()?)
    }
}

/// Exact food table name first, then the first search hit.
pub(crate) fn find_food(query: &str) -> Result<&'static FoodItem> {
    if let Some(food) = catalog::find(query.trim()) {
        return Ok(food);
    }
    match catalog::search(query).first() {
        Some(food) => Ok(*food),
        None => bail!("No food found for '{query}'. Try `nourish search`"),
    }
}

fn print_meal(meal: &MealEntry, json: bool) -> Result<()> {
    if json {
        print_json(meal)
    } else {
        println!("{}", meal_table(&[meal]));
        Ok(())
    }
}

pub(crate) fn cmd_meal_add(
    controller: &mut TrackerController,
    fields: MealFields,
    json: bool,
) -> Result<()> {
    let input = fields.into_new_input()?;
    let result = controller.add_meal(&input);
    let id = report(controller, result, json)?;
    match controller.state().meal(id) {
        Some(meal) => print_meal(meal, json),
        None => Ok(()),
    }
}

pub(crate) fn cmd_meal_edit(
    controller: &mut TrackerController,
    id: i64,
    fields: MealFields,
    keep_selected_date: bool,
    json: bool,
) -> Result<()> {
    if fields.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --name, --food, --calories, --meal, \
             --protein, --carbs, --fat, --fiber, or --quantity"
        );
    }

    let id = MealId(id);
    let Some(meal_date) = controller.state().meal(id).map(|m| m.date) else {
        not_found(id, json);
    };
    // Edits land on the selected date; stay on the meal's own day unless
    // the caller picked one.
    if !keep_selected_date {
        controller.select_date(meal_date);
    }

    let Some(form) = controller.begin_edit_meal(id) else {
        not_found(id, json);
    };
    let input = fields.apply(form)?;
    let result = controller.add_meal(&input);
    if result.is_err() {
        controller.cancel_edit();
    }
    let id = report(controller, result, json)?;
    match controller.state().meal(id) {
        Some(meal) => print_meal(meal, json),
        None => Ok(()),
    }
}

pub(crate) fn cmd_meal_delete(
    controller: &mut TrackerController,
    id: i64,
    json: bool,
) -> Result<()> {
    let id = MealId(id);
    if controller.state().meal(id).is_none() {
        not_found(id, json);
    }
    controller.delete_meal(id);
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
        Ok(())
    } else {
        report(controller, Ok(()), json)
    }
}

pub(crate) fn cmd_meal_list(controller: &TrackerController, all: bool, json: bool) -> Result<()> {
    let meals: Vec<&MealEntry> = if all {
        controller.state().meals().iter().collect()
    } else {
        let date = controller.state().selected_date();
        controller
            .state()
            .meals()
            .iter()
            .filter(|m| m.date == date)
            .collect()
    };

    if json {
        return print_json(&meals);
    }
    if meals.is_empty() {
        let date = controller.state().selected_date().format("%Y-%m-%d");
        eprintln!("No meals logged for {date}. Use `nourish meal add` or `nourish plan`.");
        return Ok(());
    }
    println!("{}", meal_table(&meals));
    Ok(())
}

pub(crate) fn cmd_plan(controller: &mut TrackerController, json: bool) -> Result<()> {
    let ids = controller.generate_meal_plan();
    let meals: Vec<&MealEntry> = ids
        .iter()
        .filter_map(|id| controller.state().meal(*id))
        .collect();

    if json {
        return print_json(&meals);
    }
    report(controller, Ok(()), json)?;
    println!("{}", meal_table(&meals));
    Ok(())
}

fn not_found(id: MealId, json: bool) -> ! {
    if json {
        println!("{}", json_error(&format!("Meal {id} not found")));
    } else {
        eprintln!("Meal {id} not found");
    }
    process::exit(2);
}
