//! Request-level entry points: `calculate` and `optimise`.

mod request;
mod response;
mod validation;

use std::sync::Arc;

use tracing::info;

pub use request::{CalculateRequest, OptimiseRequest};
pub use response::{
    ABORTED_MESSAGE, CalculateResponse, EXHAUSTED_MESSAGE, INFEASIBLE_MESSAGE, OptimiseResponse,
};
pub use validation::{
    validate_age, validate_calculate, validate_height, validate_optimise, validate_weight,
};

use crate::config::{Config, LimitsConfig};
use crate::error::Result;
use crate::models::{Food, NutrientBounds, Sex, SmokingStatus};
use crate::nutrients::catalogue::{FIBRE, SATURATED_FATS};
use crate::nutrients::{
    NutrientBoundProvider, adjust, calculate_bmr, calculate_macros, calculate_tdee,
    daily_caloric_intake,
};
use crate::planner::{
    CancellationToken, DietOptimiser, DietProblem, RelaxationPolicy, SearchOutcome, analyse,
};
use crate::solver::{MicroLpSolver, MilpSolver};

/// Stateless request handler over a bound provider and an optimiser.
pub struct DietService {
    provider: NutrientBoundProvider,
    optimiser: DietOptimiser,
    limits: LimitsConfig,
    unlimited_max_serving_g: f64,
}

impl DietService {
    /// Build from configuration with the microlp backend.
    pub fn from_config(config: &Config) -> Result<Self> {
        let solver = MicroLpSolver::with_timeout(config.optimiser.solve_timeout())
            .with_max_detached(config.optimiser.max_detached_solves);
        Self::with_solver(config, Arc::new(solver))
    }

    pub fn with_solver(config: &Config, solver: Arc<dyn MilpSolver>) -> Result<Self> {
        let provider = NutrientBoundProvider::load(config.data.dir.as_deref())?;
        Ok(Self::new(provider, solver, config))
    }

    pub fn new(
        provider: NutrientBoundProvider,
        solver: Arc<dyn MilpSolver>,
        config: &Config,
    ) -> Self {
        let policy = RelaxationPolicy::new(
            config.optimiser.relax_fibre,
            config.optimiser.max_tolerance,
        );
        Self {
            provider,
            optimiser: DietOptimiser::new(solver, policy).with_workers(config.optimiser.workers),
            limits: config.limits.clone(),
            unlimited_max_serving_g: config.optimiser.unlimited_max_serving_g,
        }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Adjusted bounds for a person, without overrides.
    pub fn bounds(&self, age: u32, sex: Sex, smoking: SmokingStatus) -> Result<NutrientBounds> {
        let base = self.provider.get_bounds(age, sex)?;
        Ok(adjust(&base, None, None, smoking))
    }

    /// Energy needs, macro targets and adjusted bounds.
    pub fn calculate(&self, req: &CalculateRequest) -> Result<CalculateResponse> {
        validate_calculate(req, &self.limits)?;

        let bmr = calculate_bmr(req.sex, req.weight, req.height, req.age);
        let tdee = calculate_tdee(bmr, req.activity);
        let intake = daily_caloric_intake(tdee, req.percentage / 100.0);
        let macros = calculate_macros(
            intake,
            req.protein / 100.0,
            req.carbohydrate / 100.0,
            req.fats / 100.0,
        );
        let bounds = self.bounds(req.age, req.sex, req.smoking_status)?;

        info!(bmr, tdee, intake, "Calculated nutrition requirements");
        Ok(CalculateResponse {
            bmr,
            tdee,
            daily_caloric_intake: intake,
            protein: macros.protein,
            carbohydrate: macros.carbohydrate,
            fats: macros.fats,
            fibre: macros.fibre,
            saturated_fats: macros.saturated_fats,
            lower_bounds: bounds.lower,
            upper_bounds: bounds.upper,
        })
    }

    pub fn optimise(&self, req: &OptimiseRequest) -> Result<OptimiseResponse> {
        self.optimise_with_cancel(req, &CancellationToken::new())
    }

    /// Validate, derive bounds, pre-check feasibility, then search.
    ///
    /// Only validation and missing reference data are errors; an infeasible
    /// or exhausted search is a `success: false` response.
    pub fn optimise_with_cancel(
        &self,
        req: &OptimiseRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimiseResponse> {
        validate_optimise(req, &self.limits)?;

        let foods: Vec<Food> = req
            .selected_foods
            .iter()
            .cloned()
            .map(Food::canonicalised)
            .collect();
        let fallback = req
            .default_max_serving
            .unwrap_or(self.unlimited_max_serving_g);
        let costs: Vec<f64> = foods.iter().map(|f| f.price).collect();
        let max_servings: Vec<f64> = foods.iter().map(|f| f.max_servings(fallback)).collect();

        let base = self.provider.get_bounds(req.age, req.sex)?;
        let mut goals = req.nutrient_goals.clone();
        let using_custom_bounds = goals.has_custom_bounds();

        let bounds = if using_custom_bounds {
            let adjusted = adjust(
                &base,
                goals.lower_bounds.as_ref(),
                goals.upper_bounds.as_ref(),
                req.smoking_status,
            );
            if let Some(fibre) = adjusted.lower.get(FIBRE) {
                goals.fibre = Some(fibre);
            }
            if let Some(limit) = adjusted.upper.get(SATURATED_FATS) {
                goals.saturated_fats = Some(limit);
            }
            info!("Using custom nutrient bounds from request");
            adjusted
        } else {
            info!("Using default nutrient bounds");
            adjust(&base, None, None, req.smoking_status)
        };

        let analysis = analyse(&foods, &max_servings, &bounds, &goals);
        if !analysis.is_feasible {
            info!(
                shortfalls = analysis.lower_bound_issues.len(),
                excesses = analysis.upper_bound_issues.len(),
                "Selection cannot meet the requirements"
            );
            return Ok(OptimiseResponse::failed(INFEASIBLE_MESSAGE, analysis));
        }

        let problem = DietProblem {
            foods: &foods,
            costs: &costs,
            max_servings: &max_servings,
            goals: &goals,
            bounds: &bounds,
        };

        Ok(match self.optimiser.optimise(&problem, cancel) {
            SearchOutcome::Optimised(mut plan) => {
                plan.using_custom_bounds = using_custom_bounds;
                OptimiseResponse::solved(plan)
            }
            SearchOutcome::Exhausted => OptimiseResponse::failed(EXHAUSTED_MESSAGE, analysis),
            SearchOutcome::Aborted => OptimiseResponse::failed(ABORTED_MESSAGE, analysis),
        })
    }
}
