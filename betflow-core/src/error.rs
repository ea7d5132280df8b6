// betflow-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BetflowError {
    // --- DOMAIN (schema rules, test vocabulary) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, parsing, database) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl From<std::io::Error> for BetflowError {
    fn from(err: std::io::Error) -> Self {
        BetflowError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for BetflowError {
    fn from(err: duckdb::Error) -> Self {
        BetflowError::Infrastructure(err.into())
    }
}
