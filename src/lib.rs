pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod nutrients;
pub mod planner;
pub mod service;
pub mod solver;
pub mod state;

pub use config::Config;
pub use error::{DietError, Result};
pub use models::{DietPlan, Food, NutrientBounds, NutrientGoals, Sex, SmokingStatus};
pub use service::{DietService, OptimiseRequest, OptimiseResponse};
