use thiserror::Error;

#[derive(Debug, Error)]
pub enum DietError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No nutrient data found for age group: {group}")]
    BoundsNotFound { group: String },

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Food already selected: {0}")]
    DuplicateFood(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DietError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DietError::Validation(_)
                | DietError::FoodNotFound(_)
                | DietError::DuplicateFood(_)
                | DietError::InvalidInput(_)
        )
    }

    /// Human-readable reasons, one per failed check.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            DietError::Validation(reasons) => reasons.clone(),
            other => vec![other.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, DietError>;
