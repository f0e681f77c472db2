use thiserror::Error;

use savings_config::ConfigError;
use savings_core::CoreError;
use savings_domain::PlanId;

/// Error type surfaced by the [`PlanManager`](crate::core::plan_manager::PlanManager) facade.
#[derive(Debug, Error)]
pub enum SavingsError {
    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Budget exceeded by {over_by:.2}")]
    OverBudget { over_by: f64 },
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<CoreError> for SavingsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PlanNotFound(id) => SavingsError::PlanNotFound(id),
            CoreError::CategoryNotFound(name) => SavingsError::CategoryNotFound(name),
            CoreError::Validation(message) => SavingsError::InvalidInput(message),
            CoreError::OverBudget { over_by } => SavingsError::OverBudget { over_by },
            CoreError::Storage(message) | CoreError::Serde(message) => {
                SavingsError::StorageError(message)
            }
            CoreError::Io(err) => SavingsError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for SavingsError {
    fn from(err: ConfigError) -> Self {
        SavingsError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for SavingsError {
    fn from(err: std::io::Error) -> Self {
        SavingsError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for SavingsError {
    fn from(err: serde_json::Error) -> Self {
        SavingsError::StorageError(err.to_string())
    }
}
