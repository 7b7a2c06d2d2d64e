use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A least-cost diet found by the optimiser.
///
/// `food_items`, `servings` and `total_cost` are parallel to the foods passed in.
/// Costs and nutrient totals are rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub food_items: Vec<String>,
    pub servings: Vec<f64>,
    pub total_cost: Vec<f64>,
    pub nutrient_totals: BTreeMap<String, f64>,
    pub total_cost_sum: f64,
    /// Percent overflow allowed above each relaxed macro goal.
    pub overflow_by_nutrient: BTreeMap<String, u32>,
    pub total_overflow: u32,
    #[serde(default)]
    pub using_custom_bounds: bool,
}

/// One selected food in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry<'a> {
    pub food_item: &'a str,
    pub servings: f64,
    pub cost: f64,
}

impl DietPlan {
    /// Foods with nonzero servings, in input order.
    pub fn entries(&self) -> Vec<PlanEntry<'_>> {
        self.food_items
            .iter()
            .zip(&self.servings)
            .zip(&self.total_cost)
            .filter(|((_, servings), _)| **servings > 0.0)
            .map(|((food_item, servings), cost)| PlanEntry {
                food_item,
                servings: *servings,
                cost: *cost,
            })
            .collect()
    }

    pub fn nutrient_total(&self, nutrient: &str) -> f64 {
        self.nutrient_totals.get(nutrient).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_skip_zero_servings() {
        let plan = DietPlan {
            food_items: vec!["Rice".into(), "Beans".into(), "Kale".into()],
            servings: vec![2.0, 0.0, 1.5],
            total_cost: vec![0.6, 0.0, 1.2],
            nutrient_totals: BTreeMap::new(),
            total_cost_sum: 1.8,
            overflow_by_nutrient: BTreeMap::new(),
            total_overflow: 0,
            using_custom_bounds: false,
        };

        let entries = plan.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].food_item, "Rice");
        assert_eq!(entries[1].food_item, "Kale");
        assert_eq!(plan.nutrient_total("protein"), 0.0);
    }
}
