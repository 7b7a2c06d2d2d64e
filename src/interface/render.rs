use crate::models::{DietPlan, Food, NutrientBounds};
use crate::nutrients::catalogue::{NUTRIENTS, display_name};
use crate::planner::FeasibilityReport;
use crate::service::{CalculateResponse, OptimiseResponse};

/// Display an optimised diet in a formatted table.
pub fn display_plan(plan: &DietPlan) {
    let entries = plan.entries();
    if entries.is_empty() {
        println!("The optimal diet selects no foods.");
        return;
    }

    println!();
    println!("=== Optimal Diet ===");
    println!();

    let max_name_len = entries
        .iter()
        .map(|e| e.food_item.len())
        .max()
        .unwrap_or(10);

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}. {:<width$} - {:>6.2} servings | ${:>6.2}",
            i + 1,
            entry.food_item,
            entry.servings,
            entry.cost,
            width = max_name_len
        );
    }

    println!();
    println!("--- Nutrient Totals ---");
    for nutrient in NUTRIENTS {
        println!(
            "  {:<36} {:>10.1}",
            display_name(nutrient.key),
            plan.nutrient_total(nutrient.key)
        );
    }

    println!();
    println!("--- Summary ---");
    println!("Total cost: ${:.2}", plan.total_cost_sum);
    if plan.total_overflow > 0 {
        let relaxed: Vec<String> = plan
            .overflow_by_nutrient
            .iter()
            .filter(|(_, pct)| **pct > 0)
            .map(|(nutrient, pct)| format!("{} +{}%", display_name(nutrient), pct))
            .collect();
        println!(
            "Goals relaxed by {}% in total: {}",
            plan.total_overflow,
            relaxed.join(", ")
        );
    } else {
        println!("All macro goals met without relaxation.");
    }
    if plan.using_custom_bounds {
        println!("Custom nutrient bounds were applied.");
    }
    println!();
}

/// Display shortfall and excess diagnostics, worst first.
pub fn display_feasibility(report: &FeasibilityReport) {
    println!();
    println!("=== Feasibility Analysis ===");

    if report.is_feasible {
        println!("The selected foods can meet every requirement.");
        println!();
        return;
    }

    if !report.lower_bound_issues.is_empty() {
        println!();
        println!("Requirements the selection cannot reach:");
        for issue in &report.lower_bound_issues {
            println!(
                "  {:<30} need {:>9.1}, max {:>9.1} (short {:.1}, {:.0}%)",
                issue.display_name,
                issue.required,
                issue.achievable,
                issue.shortfall,
                issue.shortfall_percentage
            );
        }
    }

    if !report.upper_bound_issues.is_empty() {
        println!();
        println!("Foods exceeding a limit in one serving:");
        for issue in &report.upper_bound_issues {
            println!(
                "  {} - {}: {:.1} > {:.1} (+{:.0}%)",
                issue.food_item,
                issue.display_name,
                issue.minimum,
                issue.limit,
                issue.excess_percentage
            );
        }
    }
    println!();
}

pub fn display_response(response: &OptimiseResponse) {
    if let Some(plan) = &response.result {
        display_plan(plan);
        return;
    }
    if let Some(message) = &response.message {
        println!("{}", message);
    }
    if let Some(report) = &response.feasibility_analysis {
        display_feasibility(report);
    }
}

/// Display lower and upper bounds side by side.
pub fn display_bounds(bounds: &NutrientBounds) {
    let mut nutrients: Vec<&str> = bounds
        .lower
        .iter()
        .chain(bounds.upper.iter())
        .map(|(k, _)| k)
        .collect();
    nutrients.sort_unstable();
    nutrients.dedup();

    let fmt = |v: Option<f64>| v.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".into());

    println!();
    println!("{:<28} {:>10} {:>10}", "Nutrient", "Min", "Max");
    for nutrient in nutrients {
        println!(
            "{:<28} {:>10} {:>10}",
            display_name(nutrient),
            fmt(bounds.lower.get(nutrient)),
            fmt(bounds.upper.get(nutrient))
        );
    }
    println!();
}

pub fn display_requirements(response: &CalculateResponse) {
    println!();
    println!("=== Daily Requirements ===");
    println!("BMR:            {:.0} kcal", response.bmr);
    println!("TDEE:           {:.0} kcal", response.tdee);
    println!("Target intake:  {:.0} kcal", response.daily_caloric_intake);
    println!();
    println!("Protein:        {:.0} g", response.protein);
    println!("Carbohydrate:   {:.0} g", response.carbohydrate);
    println!("Fats:           {:.0} g", response.fats);
    println!("Fibre:          {:.0} g", response.fibre);
    println!("Saturated fats: < {:.0} g", response.saturated_fats);

    display_bounds(&NutrientBounds::new(
        response.lower_bounds.clone(),
        response.upper_bounds.clone(),
    ));
}

/// Display a simple list of foods with their details.
pub fn display_food_list(foods: &[Food], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        let mut flags = Vec::new();
        if food.must_include {
            flags.push("must include");
        }
        if food.requires_integer_servings {
            flags.push("whole servings");
        }
        let max = food
            .max_serving
            .filter(|g| *g > 0.0)
            .map(|g| format!(", max {}g", g))
            .unwrap_or_default();
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!(
            "  {} ({}) - ${:.2} per {}g{}{}",
            food.description, food.fdc_id, food.price, food.serving_size, max, flags
        );
    }

    println!();
}
