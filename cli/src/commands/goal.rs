use anyhow::Result;

use nourish_core::TrackerController;

use super::helpers::print_json;

pub(crate) fn cmd_goal(
    controller: &mut TrackerController,
    calories: i64,
    json: bool,
) -> Result<()> {
    controller.set_daily_goal(calories);
    let goal = controller.state().daily_goal();
    if json {
        print_json(&serde_json::json!({ "dailyGoal": goal }))
    } else {
        println!("Daily calorie goal set to {goal} kcal");
        Ok(())
    }
}

pub(crate) fn cmd_select(controller: &TrackerController, json: bool) -> Result<()> {
    let date = controller.state().selected_date();
    if json {
        print_json(&serde_json::json!({ "selectedDate": date }))
    } else {
        println!("Selected {}", date.format("%A, %B %-d, %Y"));
        Ok(())
    }
}
