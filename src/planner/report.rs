use std::collections::BTreeMap;

use crate::models::DietPlan;
use crate::nutrients::catalogue::NUTRIENTS;
use crate::planner::program::DietProblem;
use crate::planner::relaxation::Tolerances;

/// Solver noise below this is reported as zero servings.
const SERVING_EPSILON: f64 = 1e-6;

#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Turn solved variable values into a plan.
///
/// `values` starts with one serving count per food; anything after that
/// (the selection binaries) is ignored. Rounding applies only here.
pub fn format_plan(problem: &DietProblem<'_>, values: &[f64], tolerances: &Tolerances) -> DietPlan {
    let servings: Vec<f64> = problem
        .foods
        .iter()
        .enumerate()
        .map(|(i, _)| clean_serving(values.get(i).copied().unwrap_or(0.0)))
        .collect();

    let raw_costs: Vec<f64> = servings
        .iter()
        .zip(problem.costs)
        .map(|(s, c)| s * c)
        .collect();

    let nutrient_totals: BTreeMap<String, f64> = NUTRIENTS
        .iter()
        .map(|info| {
            let total: f64 = problem
                .foods
                .iter()
                .zip(&servings)
                .map(|(food, s)| food.per_serving(info.key) * s)
                .sum();
            (info.key.to_string(), round1(total))
        })
        .collect();

    DietPlan {
        food_items: problem
            .foods
            .iter()
            .map(|f| f.description.clone())
            .collect(),
        servings,
        total_cost: raw_costs.iter().copied().map(round1).collect(),
        nutrient_totals,
        total_cost_sum: round1(raw_costs.iter().sum()),
        overflow_by_nutrient: tolerances.to_map(),
        total_overflow: tolerances.sum(),
        using_custom_bounds: false,
    }
}

fn clean_serving(value: f64) -> f64 {
    if value.abs() < SERVING_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Food, NutrientBounds, NutrientGoals};
    use crate::nutrients::catalogue::{CARBOHYDRATE, FATS, PROTEIN};

    fn sample_foods() -> Vec<Food> {
        vec![
            Food {
                fdc_id: "1".into(),
                description: "Lentils".into(),
                price: 0.36,
                serving_size: 200.0,
                max_serving: None,
                must_include: false,
                requires_integer_servings: false,
                nutrients: [(PROTEIN.to_string(), 9.02), ("Iron (mg)".to_string(), 3.2)]
                    .into_iter()
                    .collect(),
            },
            Food {
                fdc_id: "2".into(),
                description: "Olive Oil".into(),
                price: 0.15,
                serving_size: 10.0,
                max_serving: None,
                must_include: false,
                requires_integer_servings: false,
                nutrients: [(FATS.to_string(), 100.0)].into_iter().collect(),
            },
        ]
    }

    #[test]
    fn test_format_plan() {
        let foods = sample_foods();
        let goals = NutrientGoals::default();
        let bounds = NutrientBounds::default();
        let problem = DietProblem {
            foods: &foods,
            costs: &[0.36, 0.15],
            max_servings: &[10.0, 10.0],
            goals: &goals,
            bounds: &bounds,
        };
        let tolerances = Tolerances::new(vec![(PROTEIN, 2), (CARBOHYDRATE, 0), (FATS, 1)]);

        // Trailing values are the selection binaries.
        let plan = format_plan(&problem, &[2.5, 1e-9, 1.0, 0.0], &tolerances);

        assert_eq!(plan.food_items, ["Lentils", "Olive Oil"]);
        assert_eq!(plan.servings, [2.5, 0.0]);
        assert_eq!(plan.total_cost, [0.9, 0.0]);
        assert_eq!(plan.total_cost_sum, 0.9);
        assert_eq!(plan.nutrient_total(PROTEIN), 45.1);
        assert_eq!(plan.nutrient_total("Iron (mg)"), 16.0);
        assert_eq!(plan.nutrient_total(FATS), 0.0);
        assert_eq!(plan.nutrient_totals.len(), NUTRIENTS.len());
        assert_eq!(plan.overflow_by_nutrient["protein"], 2);
        assert_eq!(plan.total_overflow, 3);
        assert!(!plan.using_custom_bounds);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(0.04), 0.0);
        assert_eq!(round1(-1.26), -1.3);
    }
}
