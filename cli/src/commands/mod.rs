mod goal;
mod helpers;
mod meal;
mod search;
mod summary;
mod transfer;
mod water;
mod weight;

use anyhow::Result;

use nourish_core::{TrackerController, TrackerError};

use helpers::print_notification;

pub(crate) use goal::{cmd_goal, cmd_select};
pub(crate) use helpers::parse_date;
pub(crate) use meal::{
    MealFields, cmd_meal_add, cmd_meal_delete, cmd_meal_edit, cmd_meal_list, cmd_plan,
};
pub(crate) use search::cmd_search;
pub(crate) use summary::{cmd_budget, cmd_calendar, cmd_label, cmd_summary};
pub(crate) use transfer::{cmd_export, cmd_import};
pub(crate) use water::{cmd_water_add, cmd_water_reset};
pub(crate) use weight::{cmd_weight_history, cmd_weight_log};

/// Show the notification an operation raised, then surface its error.
pub(super) fn report<T>(
    controller: &TrackerController,
    result: Result<T, TrackerError>,
    json: bool,
) -> Result<T> {
    if !json {
        print_notification(controller.view().notification.as_ref());
    }
    Ok(result?)
}
