pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_activity, prompt_calculate_request, prompt_food_match, prompt_sex, prompt_yes_no,
};
pub use render::{
    display_bounds, display_feasibility, display_food_list, display_plan, display_requirements,
    display_response,
};
