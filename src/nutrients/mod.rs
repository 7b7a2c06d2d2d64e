pub mod adjust;
pub mod catalogue;
pub mod energy;
pub mod provider;
pub mod tables;

pub use adjust::adjust;
pub use energy::{
    MacroTargets, calculate_bmr, calculate_macros, calculate_tdee, daily_caloric_intake,
};
pub use provider::{NutrientBoundProvider, life_stage_group};
pub use tables::{ReferenceTable, TableKind};
