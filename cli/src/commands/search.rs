use anyhow::Result;

use nourish_core::TrackerController;

use super::helpers::{food_table, print_json};

pub(crate) fn cmd_search(controller: &TrackerController, query: &str, json: bool) -> Result<()> {
    let foods = controller.search_foods(query);

    if json {
        return print_json(&foods);
    }
    if foods.is_empty() {
        eprintln!("No foods match '{query}'");
        return Ok(());
    }
    println!("{}", food_table(&foods));
    eprintln!("\nLog one with: nourish meal add --food \"<name>\"");
    Ok(())
}
