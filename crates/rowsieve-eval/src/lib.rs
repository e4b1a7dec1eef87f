//! Leakage-Safe Model Comparison
//!
//! Compares a model's performance on raw versus outlier-filtered tabular
//! data without letting the test partition leak into the filtering bounds.
//!
//! # Overview
//!
//! The [`ComparisonHarness`] runs a strict protocol:
//!
//! 1. Split `(X, y)` once with a caller-supplied test fraction and seed
//!    (deterministic across runs).
//! 2. Fit and score a fresh model clone on the unmodified split.
//! 3. If a preprocessor is supplied, fit a fresh clone of it on the
//!    **training partition only**, transform train and test independently,
//!    re-align labels to the surviving row identifiers, and fit/score
//!    another fresh model clone on the filtered split.
//! 4. Report both branches as a table, `Raw` before `Processed`.
//!
//! Models are anything implementing [`Model`]; the bundled
//! [`RidgeRegressor`] is a linear baseline scored by R². Preprocessors come
//! from the `rowsieve-filtering` crate or anything else implementing its
//! `Preprocessor` trait.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rowsieve_eval::{ComparisonHarness, RidgeRegressor};
//! use rowsieve_filtering::IqrOutlierRemover;
//!
//! let mut harness = ComparisonHarness::new(Box::new(RidgeRegressor::default()))
//!     .with_preprocessor(Box::new(IqrOutlierRemover::new(["price", "qty"])));
//!
//! let report = harness.compare(&features, &target)?;
//! println!("{report}");
//! ```

pub mod error;
pub mod harness;
pub mod model;
pub mod report;
pub mod split;

// Re-exports for convenient access
pub use error::{EvalError, Result as EvalResult};
pub use harness::{ComparisonHarness, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
pub use model::{Model, ModelError, RidgeRegressor};
pub use report::{BranchLabel, BranchOutcome, ComparisonReport};
pub use split::{TrainTestSplit, train_test_split};
