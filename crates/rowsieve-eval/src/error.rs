//! Error types for the evaluation crate.
//!
//! [`EvalError`] covers everything the comparison harness can fail with:
//! its own data validation, errors propagated from the filtering crate, and
//! errors raised by the model. Nothing is retried or defaulted; every
//! failure propagates to the caller with the offending column or branch in
//! its message.

use rowsieve_filtering::FilterError;
use thiserror::Error;

use crate::model::ModelError;

/// The main error type for split and comparison operations.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Features and labels disagree on the number of rows.
    #[error("Dataset has {rows} rows but {labels} labels; they must match")]
    LengthMismatch { rows: usize, labels: usize },

    /// The requested split cannot produce two non-empty partitions.
    #[error("Cannot split {rows} rows with test fraction {test_fraction}")]
    InfeasibleSplit { rows: usize, test_fraction: f64 },

    /// The input table already uses a column name the harness reserves.
    #[error("Column '{0}' is reserved for row identifiers")]
    ReservedColumn(String),

    /// Error raised by the preprocessor.
    #[error("Preprocessing error: {0}")]
    Filter(#[from] FilterError),

    /// Error raised by the model.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Internal invariant violation (e.g., a row identifier produced by a
    /// transform that was never present in its source partition).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = EvalError::LengthMismatch { rows: 10, labels: 8 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("8"));
    }

    #[test]
    fn test_filter_error_converts() {
        let err: EvalError = FilterError::NotFitted.into();
        assert!(matches!(err, EvalError::Filter(_)));
    }
}
