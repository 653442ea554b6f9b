//! Error types for gymcal.

use thiserror::Error;

/// Errors that can occur in gymcal operations.
#[derive(Error, Debug)]
pub enum GymcalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage is full ({needed} bytes needed, {capacity} available). Delete some old workouts.")]
    QuotaExceeded { needed: u64, capacity: u64 },

    #[error("Import error: {0}")]
    Import(String),

    #[error("ICS generation error: {0}")]
    Encoding(String),

    #[error("Workout not found: {0}")]
    NotFound(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GymcalError {
    /// Whether this error came from the persistence layer rather than user input.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            GymcalError::Storage(_) | GymcalError::QuotaExceeded { .. } | GymcalError::Io(_)
        )
    }
}

/// Result type alias for gymcal operations.
pub type GymcalResult<T> = Result<T, GymcalError>;
