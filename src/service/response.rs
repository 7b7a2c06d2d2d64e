use serde::{Deserialize, Serialize};

use crate::models::{DietPlan, NutrientBoundSet};
use crate::planner::FeasibilityReport;

pub const INFEASIBLE_MESSAGE: &str =
    "Diet optimisation is not feasible with the selected foods and nutrient goals.";
pub const EXHAUSTED_MESSAGE: &str =
    "Optimisation failed! No feasible solution found even with maximum allowed nutrient flexibility.";
pub const ABORTED_MESSAGE: &str = "Optimisation was cancelled before a solution was found.";

/// Outcome of an optimisation request.
///
/// Infeasibility is an ordinary answer: `success` is false and the
/// feasibility analysis explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimiseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DietPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "feasibilityAnalysis",
        skip_serializing_if = "Option::is_none"
    )]
    pub feasibility_analysis: Option<FeasibilityReport>,
}

impl OptimiseResponse {
    pub fn solved(plan: DietPlan) -> Self {
        Self {
            success: true,
            result: Some(plan),
            message: None,
            feasibility_analysis: None,
        }
    }

    pub fn failed(message: &str, analysis: FeasibilityReport) -> Self {
        Self {
            success: false,
            result: None,
            message: Some(message.to_string()),
            feasibility_analysis: Some(analysis),
        }
    }
}

/// Energy, macro targets and the person's adjusted nutrient bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_caloric_intake: f64,
    pub protein: f64,
    pub carbohydrate: f64,
    pub fats: f64,
    pub fibre: f64,
    pub saturated_fats: f64,
    pub lower_bounds: NutrientBoundSet,
    pub upper_bounds: NutrientBoundSet,
}
