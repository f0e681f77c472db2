use thiserror::Error;

use savings_domain::PlanId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Budget exceeded by {over_by:.2}")]
    OverBudget { over_by: f64 },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
