//! Error types and handling
//!
//! Common error types used across the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toneFrequency must be a positive number not greater than 2, got {0}")]
    InvalidToneFrequency(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error response for callers that need a serializable error
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<FilterError> for ErrorResponse {
    fn from(error: FilterError) -> Self {
        let code = match &error {
            FilterError::Io(_) => "IO_ERROR",
            FilterError::Json(_) => "SERIALIZATION_ERROR",
            FilterError::InvalidToneFrequency(_) => "INVALID_TONE_FREQUENCY",
            FilterError::InvalidConfig(_) => "INVALID_CONFIG",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using FilterError
pub type FilterResult<T> = Result<T, FilterError>;
