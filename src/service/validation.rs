use crate::config::LimitsConfig;
use crate::error::{DietError, Result};
use crate::service::request::{CalculateRequest, OptimiseRequest};

pub fn validate_age(age: u32, limits: &LimitsConfig) -> Option<String> {
    if age < limits.age_min || age > limits.age_max {
        return Some(format!(
            "Age must be between {} and {}",
            limits.age_min, limits.age_max
        ));
    }
    None
}

pub fn validate_weight(weight: f64, limits: &LimitsConfig) -> Option<String> {
    if !(weight >= limits.weight_min && weight <= limits.weight_max) {
        return Some(format!(
            "Weight must be between {} and {} kg",
            limits.weight_min, limits.weight_max
        ));
    }
    None
}

pub fn validate_height(height: f64, limits: &LimitsConfig) -> Option<String> {
    if !(height >= limits.height_min && height <= limits.height_max) {
        return Some(format!(
            "Height must be between {} and {} cm",
            limits.height_min, limits.height_max
        ));
    }
    None
}

fn into_result(reasons: Vec<String>) -> Result<()> {
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(DietError::Validation(reasons))
    }
}

pub fn validate_calculate(req: &CalculateRequest, limits: &LimitsConfig) -> Result<()> {
    let mut reasons: Vec<String> = [
        validate_age(req.age, limits),
        validate_weight(req.weight, limits),
        validate_height(req.height, limits),
    ]
    .into_iter()
    .flatten()
    .collect();

    for (name, value) in [
        ("Protein share", req.protein),
        ("Carbohydrate share", req.carbohydrate),
        ("Fat share", req.fats),
        ("Intake percentage", req.percentage),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            reasons.push(format!("{} must be a non-negative percentage", name));
        }
    }
    if !(req.activity.is_finite() && req.activity > 0.0) {
        reasons.push("Activity multiplier must be positive".to_string());
    }

    into_result(reasons)
}

pub fn validate_optimise(req: &OptimiseRequest, limits: &LimitsConfig) -> Result<()> {
    let mut reasons: Vec<String> = validate_age(req.age, limits).into_iter().collect();

    if req.selected_foods.is_empty() {
        reasons.push("No foods selected".to_string());
    }
    for food in &req.selected_foods {
        reasons.extend(food.problems());
    }
    reasons.extend(req.nutrient_goals.problems());

    if req
        .default_max_serving
        .is_some_and(|g| !(g.is_finite() && g > 0.0))
    {
        reasons.push("Default max serving must be a positive number of grams".to_string());
    }

    into_result(reasons)
}
