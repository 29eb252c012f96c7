//! Error types for panel generation and processing.

use acm_common::ContractError;
use acm_model::PeriodKind;
use thiserror::Error;

/// Errors raised while building or classifying person-period tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Input table does not follow its declared layout.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The window has more periods than the never-died sentinel can mark.
    #[error("window has {periods} periods; at most {max} are supported")]
    WindowTooLong { periods: usize, max: i64 },

    /// Options ask for a period kind the generator does not produce.
    #[error("options expect {expected} periods but the generator produces {actual}")]
    PeriodKindMismatch {
        expected: PeriodKind,
        actual: PeriodKind,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
