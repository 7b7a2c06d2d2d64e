use serde::{Deserialize, Serialize};

use crate::models::{Food, NutrientGoals, Sex, SmokingStatus};

/// Inputs for a nutrition-requirements calculation.
///
/// Macro shares and the intake percentage are whole percentages
/// (30 means 30 %), matching what the web form sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(alias = "gender")]
    pub sex: Sex,
    /// Body weight in kg.
    pub weight: f64,
    /// Height in cm.
    pub height: f64,
    pub age: u32,
    /// Percent of intake energy from protein.
    pub protein: f64,
    pub carbohydrate: f64,
    pub fats: f64,
    /// Activity multiplier applied to BMR (1.2 sedentary … 1.9 very active).
    pub activity: f64,
    /// Target intake as a percent of TDEE.
    #[serde(default = "full_intake")]
    pub percentage: f64,
    #[serde(default, alias = "smoking_status")]
    pub smoking_status: SmokingStatus,
}

fn full_intake() -> f64 {
    100.0
}

/// Inputs for a least-cost diet optimisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimiseRequest {
    #[serde(alias = "selectedFoods")]
    pub selected_foods: Vec<Food>,
    #[serde(default, alias = "nutrientGoals")]
    pub nutrient_goals: NutrientGoals,
    pub age: u32,
    #[serde(alias = "gender")]
    pub sex: Sex,
    #[serde(default, rename = "smokingStatus", alias = "smoking_status")]
    pub smoking_status: SmokingStatus,
    /// Fallback cap in grams for foods without a max serving.
    #[serde(
        default,
        rename = "defaultMaxServing",
        alias = "default_max_serving",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_max_serving: Option<f64>,
}
