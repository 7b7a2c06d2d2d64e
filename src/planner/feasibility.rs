use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Food, NutrientBounds, NutrientGoals};
use crate::nutrients::catalogue::{MACRO_NUTRIENTS, SATURATED_FATS, display_name};

/// A lower bound the selected foods cannot reach even at their caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortfallIssue {
    pub nutrient: String,
    pub display_name: String,
    pub required: f64,
    pub achievable: f64,
    pub shortfall: f64,
    pub shortfall_percentage: f64,
}

/// A single food whose one serving already exceeds an upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcessIssue {
    pub nutrient: String,
    pub display_name: String,
    pub food_item: String,
    pub limit: f64,
    /// Amount in one serving of the offending food.
    pub minimum: f64,
    pub excess: f64,
    pub excess_percentage: f64,
}

/// Solver-free verdict on whether the selected foods can meet the bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityReport {
    pub analysis: String,
    pub is_lower_bounds_feasible: bool,
    pub is_upper_bounds_feasible: bool,
    pub is_feasible: bool,
    /// Worst shortfall first.
    pub lower_bound_issues: Vec<ShortfallIssue>,
    /// Worst excess first.
    pub upper_bound_issues: Vec<ExcessIssue>,
}

impl FeasibilityReport {
    pub fn new(mut lower: Vec<ShortfallIssue>, mut upper: Vec<ExcessIssue>) -> Self {
        lower.sort_by(|a, b| descending(a.shortfall_percentage, b.shortfall_percentage));
        upper.sort_by(|a, b| descending(a.excess_percentage, b.excess_percentage));

        let is_lower_bounds_feasible = lower.is_empty();
        let is_upper_bounds_feasible = upper.is_empty();
        Self {
            analysis: "Feasibility analysis completed".to_string(),
            is_lower_bounds_feasible,
            is_upper_bounds_feasible,
            is_feasible: is_lower_bounds_feasible && is_upper_bounds_feasible,
            lower_bound_issues: lower,
            upper_bound_issues: upper,
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Check every bound against what the foods can possibly deliver.
///
/// `max_servings` is parallel to `foods`. Lower bounds compare the requirement
/// with the total at every food's cap; the four macros use the caller's goals
/// instead of the table bounds. Upper bounds are checked per food at a single
/// serving, with the saturated-fat goal standing in when no table limit exists.
pub fn analyse(
    foods: &[Food],
    max_servings: &[f64],
    bounds: &NutrientBounds,
    goals: &NutrientGoals,
) -> FeasibilityReport {
    let mut lower = Vec::new();

    for (nutrient, required) in bounds.lower.iter() {
        if MACRO_NUTRIENTS.contains(&nutrient) {
            continue;
        }
        if let Some(issue) = shortfall(foods, max_servings, nutrient, required) {
            lower.push(issue);
        }
    }
    for nutrient in MACRO_NUTRIENTS {
        if let Some(goal) = goals.get(nutrient) {
            if let Some(issue) = shortfall(foods, max_servings, nutrient, goal) {
                lower.push(issue);
            }
        }
    }

    let mut upper = Vec::new();
    for (nutrient, limit) in bounds.upper.iter() {
        upper.extend(excesses(foods, nutrient, limit));
    }
    if !bounds.upper.contains(SATURATED_FATS) {
        if let Some(limit) = goals.get(SATURATED_FATS) {
            upper.extend(excesses(foods, SATURATED_FATS, limit));
        }
    }

    let report = FeasibilityReport::new(lower, upper);
    debug!(
        feasible = report.is_feasible,
        shortfalls = report.lower_bound_issues.len(),
        excesses = report.upper_bound_issues.len(),
        "Feasibility analysed"
    );
    report
}

/// Maximum total of `nutrient` with every food at its cap.
pub fn max_achievable(foods: &[Food], max_servings: &[f64], nutrient: &str) -> f64 {
    foods
        .iter()
        .zip(max_servings)
        .map(|(food, max)| food.per_serving(nutrient) * max)
        .sum()
}

fn shortfall(
    foods: &[Food],
    max_servings: &[f64],
    nutrient: &str,
    required: f64,
) -> Option<ShortfallIssue> {
    let achievable = max_achievable(foods, max_servings, nutrient);
    if achievable >= required {
        return None;
    }
    let shortfall = required - achievable;
    Some(ShortfallIssue {
        nutrient: nutrient.to_string(),
        display_name: display_name(nutrient).to_string(),
        required,
        achievable,
        shortfall,
        shortfall_percentage: if required > 0.0 {
            shortfall / required * 100.0
        } else {
            0.0
        },
    })
}

fn excesses<'a>(
    foods: &'a [Food],
    nutrient: &'a str,
    limit: f64,
) -> impl Iterator<Item = ExcessIssue> + 'a {
    foods.iter().filter_map(move |food| {
        let amount = food.per_serving(nutrient);
        if amount <= limit {
            return None;
        }
        let excess = amount - limit;
        Some(ExcessIssue {
            nutrient: nutrient.to_string(),
            display_name: display_name(nutrient).to_string(),
            food_item: food.description.clone(),
            limit,
            minimum: amount,
            excess,
            excess_percentage: if limit > 0.0 {
                excess / limit * 100.0
            } else {
                0.0
            },
        })
    })
}
