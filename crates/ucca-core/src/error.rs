use thiserror::Error;

#[derive(Debug, Error)]
pub enum UccaError {
    #[error("control action '{action}' references unknown controller '{controller}'")]
    UnknownController { action: String, controller: String },

    #[error("candidate references unknown action '{0}'")]
    UnknownAction(String),

    #[error("mandatory candidate '{description}' has {count} element(s), allowed range is 2..={max}")]
    MandatoryOutOfBounds {
        description: String,
        count: usize,
        max: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("combination budget exhausted: generated {generated} candidates, budget is {budget}")]
    BudgetExceeded { generated: usize, budget: usize },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UccaError>;
