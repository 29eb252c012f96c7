//! Error types for rate reporting.

use acm_common::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Processed table lacks a required column or carries the wrong dtype.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Cell value outside the known categories.
    #[error("unknown {column} value '{value}'")]
    UnknownValue { column: &'static str, value: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;
