use anyhow::Result;

use nourish_core::TrackerController;
use nourish_core::models::WATER_GOAL;
use nourish_core::view::TrackerView;

use super::helpers::print_json;
use super::report;

fn water_line(view: &TrackerView) -> String {
    format!(
        "Water: {} / {WATER_GOAL} ml ({:.0}%)",
        view.water_intake, view.water_progress
    )
}

fn print_water(controller: &TrackerController, json: bool) -> Result<()> {
    let view = controller.view();
    if json {
        print_json(&serde_json::json!({
            "waterIntake": view.water_intake,
            "waterGoal": WATER_GOAL,
            "waterProgress": view.water_progress,
        }))
    } else {
        report(controller, Ok(()), json)?;
        println!("{}", water_line(&view));
        Ok(())
    }
}

pub(crate) fn cmd_water_add(controller: &mut TrackerController, json: bool) -> Result<()> {
    controller.add_water();
    print_water(controller, json)
}

pub(crate) fn cmd_water_reset(controller: &mut TrackerController, json: bool) -> Result<()> {
    controller.reset_water();
    print_water(controller, json)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use nourish_core::{ManualClock, MemoryStore, PersistenceGateway};

    use super::*;

    #[test]
    fn test_water_line() {
        let mut controller = TrackerController::new(
            PersistenceGateway::new(MemoryStore::new()),
            ManualClock::new(DateTime::<Utc>::UNIX_EPOCH),
        );
        controller.add_water();
        controller.add_water();
        assert_eq!(water_line(&controller.view()), "Water: 500 / 2000 ml (25%)");
    }
}
