use crate::models::{Food, NutrientBounds, NutrientGoals};
use crate::nutrients::catalogue::{FIBRE, SATURATED_FATS, is_goal_governed};
use crate::planner::relaxation::Tolerances;
use crate::solver::{DietProgram, LinearConstraint, VariableSpec};

/// Inputs shared by every program in one relaxation search.
///
/// `costs` and `max_servings` are parallel to `foods`.
#[derive(Debug, Clone, Copy)]
pub struct DietProblem<'a> {
    pub foods: &'a [Food],
    pub costs: &'a [f64],
    pub max_servings: &'a [f64],
    pub goals: &'a NutrientGoals,
    pub bounds: &'a NutrientBounds,
}

impl<'a> DietProblem<'a> {
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Per-serving coefficients of `nutrient` on the serving variables.
    fn nutrient_terms(&self, nutrient: &str) -> Vec<(usize, f64)> {
        self.foods
            .iter()
            .enumerate()
            .map(|(i, food)| (i, food.per_serving(nutrient)))
            .collect()
    }
}

/// Index of food `i`'s serving variable.
#[inline]
pub fn servings_var(i: usize) -> usize {
    i
}

/// Index of food `i`'s selection binary.
#[inline]
pub fn used_var(n: usize, i: usize) -> usize {
    n + i
}

/// Formulate the least-cost program for one tolerance combination.
///
/// Variables are `servings_i` (0..=max, integer when the food demands it)
/// followed by binaries `used_i`. A selected food gets at least one serving.
/// Relaxed macro axes are bounded to `[goal, goal·(1 + pct/100)]`; saturated
/// fat is upper-only, and fibre is lower-only unless it is a relaxed axis.
/// Every other bounded nutrient gets its one- or two-sided constraint.
pub fn build_program(problem: &DietProblem<'_>, tolerances: &Tolerances) -> DietProgram {
    let n = problem.len();
    debug_assert_eq!(problem.costs.len(), n, "one cost per food");
    debug_assert_eq!(problem.max_servings.len(), n, "one max serving per food");
    let mut variables = Vec::with_capacity(2 * n);
    let mut constraints = Vec::new();

    for (i, (food, &max)) in problem.foods.iter().zip(problem.max_servings).enumerate() {
        let name = format!("servings_{}", i);
        variables.push(if food.requires_integer_servings {
            VariableSpec::integer(name, 0.0, max)
        } else {
            VariableSpec::continuous(name, 0.0, max)
        });
    }
    for i in 0..n {
        variables.push(VariableSpec::binary(format!("used_{}", i)));
    }

    let mut objective: Vec<f64> = problem.costs.to_vec();
    objective.resize(2 * n, 0.0);

    for (i, (food, &max)) in problem.foods.iter().zip(problem.max_servings).enumerate() {
        let (x, y) = (servings_var(i), used_var(n, i));
        constraints.push(LinearConstraint::leq(
            format!("link_max_{}", i),
            vec![(x, 1.0), (y, -max)],
            0.0,
        ));
        constraints.push(LinearConstraint::geq(
            format!("link_min_{}", i),
            vec![(x, 1.0), (y, -1.0)],
            0.0,
        ));
        if food.must_include {
            constraints.push(LinearConstraint::eq(
                format!("must_include_{}", i),
                vec![(y, 1.0)],
                1.0,
            ));
        }
    }

    for (axis, pct) in tolerances.iter() {
        if let Some(goal) = problem.goals.get(axis) {
            let terms = problem.nutrient_terms(axis);
            let ceiling = goal * (1.0 + pct as f64 / 100.0);
            constraints.push(LinearConstraint::geq(
                format!("{}_min", axis),
                terms.clone(),
                goal,
            ));
            constraints.push(LinearConstraint::leq(
                format!("{}_max", axis),
                terms,
                ceiling,
            ));
        }
    }

    if let Some(limit) = problem.goals.get(SATURATED_FATS) {
        constraints.push(LinearConstraint::leq(
            format!("{}_max", SATURATED_FATS),
            problem.nutrient_terms(SATURATED_FATS),
            limit,
        ));
    }

    if tolerances.get(FIBRE).is_none() {
        if let Some(goal) = problem.goals.get(FIBRE) {
            constraints.push(LinearConstraint::geq(
                format!("{}_min", FIBRE),
                problem.nutrient_terms(FIBRE),
                goal,
            ));
        }
    }

    for (nutrient, lower) in problem.bounds.lower.iter() {
        if !is_goal_governed(nutrient) {
            constraints.push(LinearConstraint::geq(
                format!("{}_min", nutrient),
                problem.nutrient_terms(nutrient),
                lower,
            ));
        }
    }
    for (nutrient, upper) in problem.bounds.upper.iter() {
        if !is_goal_governed(nutrient) {
            constraints.push(LinearConstraint::leq(
                format!("{}_max", nutrient),
                problem.nutrient_terms(nutrient),
                upper,
            ));
        }
    }

    DietProgram {
        variables,
        objective,
        constraints,
    }
}
