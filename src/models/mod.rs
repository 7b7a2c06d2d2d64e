pub mod bounds;
pub mod food;
pub mod goals;
pub mod plan;

pub use bounds::{BoundOverrides, NutrientBoundSet, NutrientBounds};
pub use food::Food;
pub use goals::{NutrientGoals, Sex, SmokingStatus};
pub use plan::{DietPlan, PlanEntry};
