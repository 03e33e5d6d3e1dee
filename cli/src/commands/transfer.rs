use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use nourish_core::TrackerController;

use super::helpers::print_json;
use super::report;

/// Write an export document to `path`, or to its suggested file name in the
/// current directory.
pub(crate) fn cmd_export(
    controller: &mut TrackerController,
    path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let document = controller.export_snapshot();
    let path = path.unwrap_or_else(|| PathBuf::from(document.file_name()));
    let contents = document
        .to_json_pretty()
        .context("Failed to serialize export")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "path": path,
            "meals": document.meals.len(),
            "weightEntries": document.weight_log.len(),
        }))
    } else {
        report(controller, Ok(()), json)?;
        println!(
            "Wrote {} meals and {} weight entries to {}",
            document.meals.len(),
            document.weight_log.len(),
            path.display()
        );
        Ok(())
    }
}

pub(crate) fn cmd_import(
    controller: &mut TrackerController,
    path: &Path,
    json: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let result = controller.import_snapshot(&raw);
    let summary = report(controller, result, json)
        .with_context(|| format!("Could not import {}", path.display()))?;

    if json {
        print_json(&summary)
    } else {
        println!("  Meals:          {}", summary.meals_imported);
        println!("  Weight entries: {}", summary.weight_entries_imported);
        println!("  Water:          {} ml", summary.water_intake);
        println!("  Daily goal:     {} kcal", summary.daily_goal);
        Ok(())
    }
}
