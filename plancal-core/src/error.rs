//! Error types for plancal.

use thiserror::Error;

use crate::validation::FormError;

/// Errors that can occur in plancal operations.
///
/// The scheduling engine itself is total over its inputs; these errors come
/// from the layers around it (configuration, serialization, form checks).
#[derive(Error, Debug)]
pub enum PlanCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlanCalError {
    fn from(err: serde_json::Error) -> Self {
        PlanCalError::Serialization(err.to_string())
    }
}

/// Result type alias for plancal operations.
pub type PlanCalResult<T> = Result<T, PlanCalError>;
