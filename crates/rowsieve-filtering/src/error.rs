//! Custom error types for the filtering crate.
//!
//! This module provides the error hierarchy used by the bounds estimators
//! and the row filter, built with `thiserror`.
//!
//! Misconfiguration (a monitored column that does not exist, transforming
//! before fitting) is an error; numeric degeneracy (a constant column, too
//! few rows for a standard deviation) is not. Degenerate bounds are
//! produced as-is so callers can observe them.

use thiserror::Error;

/// The main error type for bounds estimation and row filtering.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A monitored column was not found in the input table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A monitored column does not hold numeric values.
    #[error("Column '{column}' has non-numeric dtype {dtype}; only numeric columns can be monitored")]
    NonNumericColumn { column: String, dtype: String },

    /// `transform` was called before `fit` populated any bounds.
    #[error("Estimator has not been fitted; call fit before transform")]
    NotFitted,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for filtering operations.
pub type Result<T> = std::result::Result<T, FilterError>;
