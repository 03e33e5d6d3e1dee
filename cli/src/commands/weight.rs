use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nourish_core::TrackerController;
use nourish_core::view::WeightTrend;

use super::helpers::{no_neg_zero, print_json};
use super::report;

const LBS_PER_KG: f64 = 2.20462;
const KG_PER_LB: f64 = 0.453_592;

pub(crate) fn to_kg(value: f64, unit: &str) -> Result<f64> {
    match unit.to_lowercase().as_str() {
        "kg" => Ok(value),
        "lbs" | "lb" => Ok(no_neg_zero(value * KG_PER_LB)),
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    }
}

pub(crate) fn cmd_weight_log(
    controller: &mut TrackerController,
    value: f64,
    unit: &str,
    json: bool,
) -> Result<()> {
    let weight_kg = to_kg(value, unit)?;
    if !json && !unit.eq_ignore_ascii_case("kg") {
        eprintln!("Converting {value:.1} lbs → {weight_kg:.2} kg");
    }

    let result = controller.log_weight(weight_kg);
    report(controller, result, json)?;

    let date = controller.state().selected_date();
    let Some(entry) = controller.state().weight_log().iter().find(|w| w.date == date) else {
        return Ok(());
    };
    if json {
        print_json(entry)
    } else {
        println!(
            "Logged {:.1} kg ({:.1} lbs) for {}",
            entry.weight,
            entry.weight * LBS_PER_KG,
            entry.date.format("%Y-%m-%d")
        );
        Ok(())
    }
}

fn trend_line(trend: &WeightTrend) -> Option<String> {
    let (first, last) = (trend.points.first()?, trend.points.last()?);
    let change = no_neg_zero(last.weight - first.weight);
    Some(format!(
        "Last {} entries: {:.1} to {:.1} kg (change {change:+.1} kg)",
        trend.points.len(),
        trend.min,
        trend.max
    ))
}

pub(crate) fn cmd_weight_history(controller: &TrackerController, json: bool) -> Result<()> {
    let entries = controller.state().weight_log();

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        eprintln!("No weight entries found. Use `nourish weight log` to record your weight.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct WeightRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight (kg)")]
        kg: String,
        #[tabled(rename = "Weight (lbs)")]
        lbs: String,
    }

    let rows: Vec<WeightRow> = entries
        .iter()
        .map(|e| WeightRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            kg: format!("{:.1}", e.weight),
            lbs: format!("{:.1}", e.weight * LBS_PER_KG),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    if let Some(line) = trend_line(&controller.view().weight_trend) {
        println!("{line}");
    }
    Ok(())
}
