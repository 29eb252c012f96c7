use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown age band: {0}")]
    UnknownAgeBand(String),
    #[error("unknown survival status: {0}")]
    UnknownSurvivalStatus(String),
    #[error("unknown vaccination status code: {0}")]
    UnknownVaccinationCode(i32),
    #[error("unknown vaccination status: {0}")]
    UnknownVaccinationStatus(String),
    #[error("unknown period kind: {0}")]
    UnknownPeriodKind(String),
    #[error("unknown source: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
