//! Error types for the ronda pipeline.
//!
//! This module defines the error taxonomy shared across the pipeline stages.
//! Data-integrity failures (ordering, leakage risks) are always fatal to the
//! current ticker's run; missing fundamental data is the one category that
//! degrades gracefully instead of erroring.

use thiserror::Error;

/// The main error type for ronda operations.
#[derive(Debug, Error)]
pub enum RondaError {
    /// Raw data could not be fetched or loaded for a ticker.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Too few usable rows remain after trimming to produce a model.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Invalid configuration, rejected before any computation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A model artifact is unusable: wrong version, empty feature list,
    /// or a blob that fails structural validation.
    #[error("Model mismatch: {0}")]
    ModelMismatch(String),

    /// Backtest input dates are out of order or duplicated.
    #[error("Data ordering violation: {0}")]
    DataOrdering(String),

    /// A required column is missing from the input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for RondaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for RondaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RondaError::DataOrdering("dates not increasing".to_string());
        assert_eq!(
            err.to_string(),
            "Data ordering violation: dates not increasing"
        );

        let err = RondaError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "Missing required column: close");
    }

    #[test]
    fn test_error_variants() {
        let err = RondaError::InsufficientData("only 12 rows".to_string());
        assert!(matches!(err, RondaError::InsufficientData(_)));

        let err: RondaError = "fail".into();
        assert!(matches!(err, RondaError::Other(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());
    }
}
