use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use diet_optimiser_rs::models::{Food, NutrientBounds, NutrientGoals};
use diet_optimiser_rs::planner::analyse;

const TRACKED: [&str; 4] = ["Iron (mg)", "Vitamin C (mg)", "Calcium (mg)", "protein"];

fn random_food(rng: &mut StdRng, id: usize) -> Food {
    let mut nutrients = BTreeMap::new();
    for key in TRACKED {
        if rng.gen_bool(0.6) {
            nutrients.insert(key.to_string(), rng.gen_range(0.0..40.0));
        }
    }
    Food {
        fdc_id: id.to_string(),
        description: format!("Food {}", id),
        price: rng.gen_range(0.1..5.0),
        serving_size: rng.gen_range(20.0..250.0),
        max_serving: Some(rng.gen_range(50.0..600.0)),
        must_include: false,
        requires_integer_servings: false,
        nutrients,
    }
}

fn bounds() -> NutrientBounds {
    NutrientBounds::new(
        [("Iron (mg)", 20.0), ("Vitamin C (mg)", 90.0), ("Calcium (mg)", 300.0)]
            .into_iter()
            .collect(),
        Default::default(),
    )
}

fn caps(foods: &[Food]) -> Vec<f64> {
    foods.iter().map(|f| f.max_servings(10_000.0)).collect()
}

#[test]
fn test_adding_foods_never_adds_shortfalls() {
    let mut rng = StdRng::seed_from_u64(7);
    let bounds = bounds();
    let goals = NutrientGoals {
        protein: Some(60.0),
        ..Default::default()
    };

    for _ in 0..50 {
        let count = rng.gen_range(1..6);
        let mut foods: Vec<Food> = (0..count).map(|i| random_food(&mut rng, i)).collect();
        let before = analyse(&foods, &caps(&foods), &bounds, &goals);

        foods.push(random_food(&mut rng, count));
        let after = analyse(&foods, &caps(&foods), &bounds, &goals);

        if before.is_lower_bounds_feasible {
            assert!(after.is_lower_bounds_feasible);
        }
        for issue in &after.lower_bound_issues {
            let prior = before
                .lower_bound_issues
                .iter()
                .find(|i| i.nutrient == issue.nutrient)
                .expect("new shortfall appeared");
            assert!(issue.shortfall <= prior.shortfall + 1e-9);
        }
    }
}

#[test]
fn test_issues_sorted_worst_first() {
    let mut rng = StdRng::seed_from_u64(42);
    let foods: Vec<Food> = (0..3).map(|i| random_food(&mut rng, i)).collect();
    let demanding = NutrientBounds::new(
        TRACKED
            .iter()
            .map(|k| (*k, rng.gen_range(1_000.0..100_000.0)))
            .collect(),
        Default::default(),
    );

    let report = analyse(&foods, &caps(&foods), &demanding, &NutrientGoals::default());
    assert!(!report.is_feasible);
    for pair in report.lower_bound_issues.windows(2) {
        assert!(pair[0].shortfall_percentage >= pair[1].shortfall_percentage);
    }
}

#[test]
fn test_single_serving_over_limit_is_reported() {
    let mut food = Food {
        fdc_id: "1".into(),
        description: "Liver".into(),
        price: 1.0,
        serving_size: 100.0,
        max_serving: None,
        must_include: false,
        requires_integer_servings: false,
        nutrients: BTreeMap::new(),
    };
    food.nutrients.insert("Vitamin A (µg)".into(), 6_000.0);
    let bounds = NutrientBounds::new(
        Default::default(),
        [("Vitamin A (µg)", 3_000.0)].into_iter().collect(),
    );

    let report = analyse(&[food], &[10.0], &bounds, &NutrientGoals::default());
    assert!(report.is_lower_bounds_feasible);
    assert!(!report.is_upper_bounds_feasible);
    let issue = &report.upper_bound_issues[0];
    assert_eq!(issue.food_item, "Liver");
    assert!((issue.excess - 3_000.0).abs() < 1e-9);
    assert!((issue.excess_percentage - 100.0).abs() < 1e-9);
}
