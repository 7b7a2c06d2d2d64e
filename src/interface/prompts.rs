use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};

use crate::config::LimitsConfig;
use crate::error::{DietError, Result};
use crate::models::{Sex, SmokingStatus};
use crate::service::CalculateRequest;
use crate::state::FoodSelection;

/// Standard activity multipliers offered by the wizard.
pub const ACTIVITY_LEVELS: [(&str, f64); 5] = [
    ("Sedentary (little or no exercise)", 1.2),
    ("Lightly active (1-3 days/week)", 1.375),
    ("Moderately active (3-5 days/week)", 1.55),
    ("Very active (6-7 days/week)", 1.725),
    ("Extra active (physical job or twice daily)", 1.9),
];

/// Prompt for a number, re-parsing the text the user typed.
fn prompt_number<T: FromStr>(prompt: &str, default: &str) -> Result<T> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| DietError::InvalidInput(format!("Invalid number: {}", input)))
}

pub fn prompt_sex() -> Result<Sex> {
    let selection = Select::new()
        .with_prompt("Sex")
        .items(&["Male", "Female"])
        .default(0)
        .interact()?;

    Ok(if selection == 0 { Sex::Male } else { Sex::Female })
}

pub fn prompt_activity() -> Result<f64> {
    let labels: Vec<String> = ACTIVITY_LEVELS
        .iter()
        .map(|(label, mult)| format!("{} x{}", label, mult))
        .collect();

    let selection = Select::new()
        .with_prompt("Activity level")
        .items(&labels)
        .default(2)
        .interact()?;

    Ok(ACTIVITY_LEVELS[selection.min(ACTIVITY_LEVELS.len() - 1)].1)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Walk the user through every input of a requirements calculation.
pub fn prompt_calculate_request(limits: &LimitsConfig) -> Result<CalculateRequest> {
    let sex = prompt_sex()?;
    let age: u32 = prompt_number(
        &format!("Age ({}-{})", limits.age_min, limits.age_max),
        "30",
    )?;
    let weight: f64 = prompt_number(
        &format!("Weight in kg ({}-{})", limits.weight_min, limits.weight_max),
        "70",
    )?;
    let height: f64 = prompt_number(
        &format!("Height in cm ({}-{})", limits.height_min, limits.height_max),
        "175",
    )?;
    let activity = prompt_activity()?;

    let protein: f64 = prompt_number("Protein share of calories (%)", "30")?;
    let carbohydrate: f64 = prompt_number("Carbohydrate share of calories (%)", "40")?;
    let fats: f64 = prompt_number("Fat share of calories (%)", "30")?;
    if protein + carbohydrate + fats > 100.0 {
        println!("Note: macro shares add up to more than 100%.");
    }

    let percentage: f64 = prompt_number("Target intake as % of maintenance", "100")?;
    let smoker = prompt_yes_no("Do you smoke?", false)?;

    Ok(CalculateRequest {
        sex,
        weight,
        height,
        age,
        protein,
        carbohydrate,
        fats,
        activity,
        percentage,
        smoking_status: SmokingStatus::from_flag(smoker),
    })
}

/// Resolve a typed food name to a selected food's id, with fuzzy fallback.
///
/// Returns `None` when nothing matches or the user declines every suggestion.
pub fn prompt_food_match(selection: &FoodSelection, query: &str) -> Result<Option<String>> {
    let query = query.trim();
    if let Some(food) = selection.get(query) {
        return Ok(Some(food.fdc_id.clone()));
    }

    let candidates = selection.similar(query, 5);

    if candidates.is_empty() {
        println!("No matching food found for '{}'", query);
        return Ok(None);
    }

    if candidates.len() == 1 {
        let food = candidates[0].0;
        let confirm = prompt_yes_no(&format!("Did you mean '{}'?", food.description), true)?;
        return Ok(confirm.then(|| food.fdc_id.clone()));
    }

    // Multiple matches - let user select
    let mut options: Vec<String> = candidates
        .iter()
        .map(|(f, _)| f.description.clone())
        .collect();
    options.push("None of these".to_string());

    let selection_index = Select::new()
        .with_prompt("Which did you mean?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(candidates
        .get(selection_index)
        .map(|(food, _)| food.fdc_id.clone()))
}
