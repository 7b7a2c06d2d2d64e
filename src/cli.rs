use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::models::Sex;

/// dietopt: finds the cheapest diet that meets your nutrient requirements.
#[derive(Parser, Debug)]
#[command(name = "dietopt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory with the reference CSV tables (overrides the config).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of formatted tables.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Who the requirements are for.
#[derive(Args, Debug, Clone)]
pub struct PersonArgs {
    #[arg(long, value_enum)]
    pub sex: Sex,

    #[arg(long)]
    pub age: u32,

    /// Adds 35 mg to the vitamin C requirement.
    #[arg(long)]
    pub smoker: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate energy needs, macro targets and nutrient bounds.
    Calculate {
        /// Ask for every input interactively.
        #[arg(short, long)]
        interactive: bool,

        #[arg(long, value_enum, required_unless_present = "interactive")]
        sex: Option<Sex>,

        #[arg(long, required_unless_present = "interactive")]
        age: Option<u32>,

        /// Weight in kg.
        #[arg(long, required_unless_present = "interactive")]
        weight: Option<f64>,

        /// Height in cm.
        #[arg(long, required_unless_present = "interactive")]
        height: Option<f64>,

        /// Activity multiplier (1.2 sedentary to 1.9 extra active).
        #[arg(long, default_value_t = 1.55)]
        activity: f64,

        /// Percent of calories from protein.
        #[arg(long, default_value_t = 30.0)]
        protein: f64,

        /// Percent of calories from carbohydrate.
        #[arg(long, default_value_t = 40.0)]
        carbohydrate: f64,

        /// Percent of calories from fat.
        #[arg(long, default_value_t = 30.0)]
        fats: f64,

        /// Target intake as a percent of TDEE.
        #[arg(long, default_value_t = 100.0)]
        percentage: f64,

        #[arg(long)]
        smoker: bool,
    },

    /// Show the nutrient bounds for a person.
    Bounds {
        #[command(flatten)]
        person: PersonArgs,
    },

    /// Find the least-cost diet.
    Optimise {
        /// JSON optimise request; when given, the other inputs are ignored.
        #[arg(long)]
        request: Option<PathBuf>,

        /// Food selection JSON file.
        #[arg(short, long, default_value = "selection.json")]
        foods: PathBuf,

        /// JSON file with nutrient goals.
        #[arg(short, long, required_unless_present = "request")]
        goals: Option<PathBuf>,

        #[arg(long, value_enum, required_unless_present = "request")]
        sex: Option<Sex>,

        #[arg(long, required_unless_present = "request")]
        age: Option<u32>,

        #[arg(long)]
        smoker: bool,

        /// Grams cap for foods without a max serving.
        #[arg(long)]
        default_max_serving: Option<f64>,
    },

    /// Manage the food selection.
    Foods {
        /// Food selection JSON file.
        #[arg(short, long, default_value = "selection.json")]
        file: PathBuf,

        #[command(subcommand)]
        action: FoodsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoodsAction {
    /// List selected foods.
    List,

    /// Remove a food by id or name (fuzzy matched).
    Remove { name: String },

    /// Add foods from a JSON array of foods.
    Add { path: PathBuf },

    /// Import foods from a selected-foods CSV.
    Import { path: PathBuf },

    /// Export the selection as CSV.
    Export { path: PathBuf },

    /// Remove every food.
    Clear,
}
