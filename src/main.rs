use std::fs;
use std::path::Path;

use clap::Parser;
use serde::Serialize;

use diet_optimiser_rs::cli::{Cli, Command, FoodsAction, PersonArgs};
use diet_optimiser_rs::config::Config;
use diet_optimiser_rs::error::{DietError, Result};
use diet_optimiser_rs::interface::{
    display_bounds, display_food_list, display_requirements, display_response,
    prompt_calculate_request, prompt_food_match, prompt_yes_no,
};
use diet_optimiser_rs::models::{Food, NutrientGoals, SmokingStatus};
use diet_optimiser_rs::service::{CalculateRequest, DietService, OptimiseRequest};
use diet_optimiser_rs::state::{
    FoodSelection, export_csv_path, import_csv_path, load_foods, load_selection, save_foods,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.data.dir = Some(dir.clone());
    }
    config.logging.init();

    match cli.command {
        Command::Calculate {
            interactive,
            sex,
            age,
            weight,
            height,
            activity,
            protein,
            carbohydrate,
            fats,
            percentage,
            smoker,
        } => {
            let service = DietService::from_config(&config)?;
            let request = if interactive {
                prompt_calculate_request(service.limits())?
            } else {
                CalculateRequest {
                    sex: sex.ok_or_else(|| missing("--sex"))?,
                    age: age.ok_or_else(|| missing("--age"))?,
                    weight: weight.ok_or_else(|| missing("--weight"))?,
                    height: height.ok_or_else(|| missing("--height"))?,
                    activity,
                    protein,
                    carbohydrate,
                    fats,
                    percentage,
                    smoking_status: SmokingStatus::from_flag(smoker),
                }
            };
            cmd_calculate(&service, &request, cli.json)
        }
        Command::Bounds { person } => cmd_bounds(&config, &person, cli.json),
        Command::Optimise {
            request,
            foods,
            goals,
            sex,
            age,
            smoker,
            default_max_serving,
        } => {
            let request = match request {
                Some(path) => read_json::<OptimiseRequest>(&path)?,
                None => {
                    let selection = load_selection(&foods)?;
                    if selection.is_empty() {
                        println!("No foods selected. Use 'foods add' or 'foods import' first.");
                        return Ok(());
                    }
                    let goals_path = goals.ok_or_else(|| missing("--goals"))?;
                    OptimiseRequest {
                        selected_foods: selection.to_foods(),
                        nutrient_goals: read_json::<NutrientGoals>(&goals_path)?,
                        age: age.ok_or_else(|| missing("--age"))?,
                        sex: sex.ok_or_else(|| missing("--sex"))?,
                        smoking_status: SmokingStatus::from_flag(smoker),
                        default_max_serving,
                    }
                }
            };
            cmd_optimise(&config, &request, cli.json)
        }
        Command::Foods { file, action } => cmd_foods(&file, action, cli.json),
    }
}

fn missing(flag: &str) -> DietError {
    DietError::InvalidInput(format!("{} is required", flag))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Calculate energy needs, macro targets and bounds.
fn cmd_calculate(service: &DietService, request: &CalculateRequest, json: bool) -> Result<()> {
    let response = service.calculate(request)?;
    if json {
        return print_json(&response);
    }
    display_requirements(&response);
    Ok(())
}

/// Show adjusted bounds for a person.
fn cmd_bounds(config: &Config, person: &PersonArgs, json: bool) -> Result<()> {
    let service = DietService::from_config(config)?;
    let bounds = service.bounds(
        person.age,
        person.sex,
        SmokingStatus::from_flag(person.smoker),
    )?;
    if json {
        return print_json(&bounds);
    }
    display_bounds(&bounds);
    Ok(())
}

/// Run the least-cost search.
fn cmd_optimise(config: &Config, request: &OptimiseRequest, json: bool) -> Result<()> {
    let service = DietService::from_config(config)?;
    if !json {
        println!(
            "Optimising over {} foods...",
            request.selected_foods.len()
        );
    }

    let response = service.optimise(request)?;
    if json {
        return print_json(&response);
    }
    display_response(&response);
    Ok(())
}

/// Add foods, reporting ids that are already selected.
fn add_all(selection: &mut FoodSelection, foods: Vec<Food>) -> Result<usize> {
    let mut added = 0;
    for food in foods {
        match selection.add(food) {
            Ok(()) => added += 1,
            Err(DietError::DuplicateFood(name)) => println!("Skipped (already selected): {}", name),
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}

/// Manage the saved food selection.
fn cmd_foods(file: &Path, action: FoodsAction, json: bool) -> Result<()> {
    let mut selection = load_selection(file)?;

    match action {
        FoodsAction::List => {
            if json {
                return print_json(&selection.foods());
            }
            display_food_list(selection.foods(), "Selected Foods");
            return Ok(());
        }
        FoodsAction::Remove { name } => {
            let Some(id) = prompt_food_match(&selection, &name)? else {
                return Ok(());
            };
            let removed = selection.remove(&id)?;
            println!("Removed: {}", removed.description);
        }
        FoodsAction::Add { path } => {
            let added = add_all(&mut selection, load_foods(&path)?)?;
            println!("Added {} foods.", added);
        }
        FoodsAction::Import { path } => {
            let added = add_all(&mut selection, import_csv_path(&path)?)?;
            println!("Imported {} foods.", added);
        }
        FoodsAction::Export { path } => {
            export_csv_path(&path, selection.foods())?;
            println!("Exported {} foods to {}", selection.len(), path.display());
            return Ok(());
        }
        FoodsAction::Clear => {
            if !prompt_yes_no("Remove every selected food?", false)? {
                return Ok(());
            }
            selection.clear();
            println!("Selection cleared.");
        }
    }

    save_foods(file, selection.foods())?;
    println!("Selection saved.");
    Ok(())
}
