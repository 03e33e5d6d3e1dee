mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    MealFields, cmd_budget, cmd_calendar, cmd_export, cmd_goal, cmd_import, cmd_label,
    cmd_meal_add, cmd_meal_delete, cmd_meal_edit, cmd_meal_list, cmd_plan, cmd_search, cmd_select,
    cmd_summary, cmd_water_add, cmd_water_reset, cmd_weight_history, cmd_weight_log, parse_date,
};
use crate::config::Config;
use nourish_core::{PersistenceGateway, SqliteStore, SystemClock, TrackerController};

#[derive(Parser)]
#[command(
    name = "nourish",
    version,
    about = "Track meals, water, and weight from the terminal",
    long_about = "Track meals, water, and weight from the terminal.\n\n\
                  Every command works on the selected day. Pick another one with --date."
)]
struct Cli {
    /// Day to work on (YYYY-MM-DD or today/yesterday/tomorrow); becomes the selected day
    #[arg(long, global = true)]
    date: Option<String>,
    /// Directory holding nourish.db (default: the platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log, edit, and list meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Add a four-meal plan (breakfast, lunch, dinner, snack) to the selected day
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track water intake
    Water {
        #[command(subcommand)]
        command: WaterCommands,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Set the daily calorie goal
    Goal {
        /// Calories per day (negative values become 0)
        #[arg(allow_hyphen_values = true)]
        calories: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the selected day
    Select {
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow)
        date: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the selected day's calories, macros, goal progress, and water
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the selected month with the days that have meals
    Calendar {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search the built-in food table
    Search {
        /// Search query
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a nutrition facts label for the selected day
    Label {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare the selected day's calories with a budget
    Budget {
        /// Calorie budget
        budget: i64,
        /// Calories burned by exercise
        #[arg(long, default_value = "0")]
        burned: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all data to a JSON file
    Export {
        /// Output path (default: ./health-tracker-data-YYYY-MM-DD.json)
        path: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace all data with the contents of an exported JSON file
    Import {
        /// Path to the JSON file
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct MealArgs {
    /// Pre-fill from the food table (see `nourish search`)
    #[arg(long)]
    food: Option<String>,
    /// Calories per serving
    #[arg(short, long)]
    calories: Option<f64>,
    /// Meal type: breakfast, lunch, dinner, snack
    #[arg(short, long)]
    meal: Option<String>,
    /// Protein per serving (g)
    #[arg(long)]
    protein: Option<f64>,
    /// Carbs per serving (g)
    #[arg(long)]
    carbs: Option<f64>,
    /// Fat per serving (g)
    #[arg(long)]
    fat: Option<f64>,
    /// Fiber per serving (g)
    #[arg(long)]
    fiber: Option<f64>,
    /// Number of servings (default: 1)
    #[arg(short, long)]
    quantity: Option<f64>,
}

impl MealArgs {
    fn into_fields(self, name: Option<String>) -> MealFields {
        MealFields {
            name,
            food: self.food,
            calories: self.calories,
            meal_type: self.meal,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            quantity: self.quantity,
        }
    }
}

#[derive(Subcommand)]
enum MealCommands {
    /// Log a meal on the selected day
    Add {
        /// Meal name (optional with --food)
        name: Option<String>,
        #[command(flatten)]
        meal: MealArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a logged meal
    Edit {
        /// Meal ID
        id: i64,
        /// New meal name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        meal: MealArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a meal by ID
    Delete {
        /// Meal ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List meals on the selected day
    List {
        /// List every logged meal
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WaterCommands {
    /// Add a 250 ml glass
    Add {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset water intake to 0
    Reset {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log weight for the selected day (replaces an earlier entry for that day)
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last 30 weigh-ins
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    debug!(data_dir = %config.data_dir.display(), "opening tracker database");
    let store = SqliteStore::open(&config.db_path)?;
    let mut tracker = TrackerController::new(PersistenceGateway::new(store), SystemClock);

    let date_given = cli.date.is_some();
    if let Some(date) = cli.date {
        tracker.select_date(parse_date(&date)?);
    }

    match cli.command {
        Commands::Meal { command } => match command {
            MealCommands::Add { name, meal, json } => {
                cmd_meal_add(&mut tracker, meal.into_fields(name), json)
            }
            MealCommands::Edit {
                id,
                name,
                meal,
                json,
            } => cmd_meal_edit(&mut tracker, id, meal.into_fields(name), date_given, json),
            MealCommands::Delete { id, json } => cmd_meal_delete(&mut tracker, id, json),
            MealCommands::List { all, json } => cmd_meal_list(&tracker, all, json),
        },
        Commands::Plan { json } => cmd_plan(&mut tracker, json),
        Commands::Water { command } => match command {
            WaterCommands::Add { json } => cmd_water_add(&mut tracker, json),
            WaterCommands::Reset { json } => cmd_water_reset(&mut tracker, json),
        },
        Commands::Weight { command } => match command {
            WeightCommands::Log { value, unit, json } => {
                cmd_weight_log(&mut tracker, value, &unit, json)
            }
            WeightCommands::History { json } => cmd_weight_history(&tracker, json),
        },
        Commands::Goal { calories, json } => cmd_goal(&mut tracker, calories, json),
        Commands::Select { date, json } => {
            tracker.select_date(parse_date(&date)?);
            cmd_select(&tracker, json)
        }
        Commands::Summary { json } => cmd_summary(&tracker, json),
        Commands::Calendar { json } => cmd_calendar(&tracker, json),
        Commands::Search { query, json } => cmd_search(&tracker, &query, json),
        Commands::Label { json } => cmd_label(&tracker, json),
        Commands::Budget {
            budget,
            burned,
            json,
        } => cmd_budget(&tracker, budget, burned, json),
        Commands::Export { path, json } => cmd_export(&mut tracker, path, json),
        Commands::Import { path, json } => cmd_import(&mut tracker, &path, json),
    }
}
