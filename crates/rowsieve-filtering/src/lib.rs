//! Bounds-Based Outlier Filtering
//!
//! Row-level outlier removal for tabular numeric data built on Polars.
//!
//! # Overview
//!
//! Two interchangeable estimators learn per-column admissible value ranges
//! from a reference table and then reject rows falling outside any monitored
//! column's range:
//!
//! - **Standard deviation**: `mean ± factor * sample std` (factor 3.0 by
//!   default)
//! - **Interquartile range**: `[Q1 - factor * IQR, Q3 + factor * IQR]`
//!   (factor 1.5 by default), quartiles by linear interpolation
//!
//! Both variants implement [`Preprocessor`] (fit/transform/fresh_clone) and
//! [`BoundsEstimator`] (fitted bounds access), and share the row-rejection
//! logic in [`RowFilter`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rowsieve_filtering::{IqrOutlierRemover, Preprocessor};
//! use polars::prelude::*;
//!
//! let df = df! {
//!     "price" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0],
//! }?;
//!
//! let mut remover = IqrOutlierRemover::new(["price"]);
//! remover.fit(&df)?;
//! let cleaned = remover.transform(&df)?;
//! assert_eq!(cleaned.height(), 9);
//! ```
//!
//! # Degeneracies
//!
//! Degenerate statistics are surfaced, never corrected: a constant column
//! collapses its bounds to a single point, and a column with fewer than two
//! values produces NaN bounds that exclude every row. See the estimator type
//! docs for details.

pub mod bounds;
pub mod config;
pub mod error;
pub mod estimators;
pub mod filter;
mod stats;
pub mod utils;

// Re-exports for convenient access
pub use bounds::{BoundsMap, ColumnBounds};
pub use config::BoundsConfig;
pub use error::{FilterError, Result as FilterResult};
pub use estimators::{
    BoundsEstimator, DEFAULT_IQR_FACTOR, DEFAULT_STD_FACTOR, IqrOutlierRemover, Preprocessor,
    StdOutlierRemover,
};
pub use filter::RowFilter;
pub use utils::is_numeric_dtype;
