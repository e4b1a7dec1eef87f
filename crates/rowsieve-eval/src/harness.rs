//! Leakage-safe raw-versus-filtered model comparison.

use crate::error::{EvalError, Result};
use crate::model::Model;
use crate::report::{BranchLabel, BranchOutcome, ComparisonReport};
use crate::split::train_test_split;
use polars::prelude::*;
use rowsieve_filtering::Preprocessor;
use std::collections::HashMap;
use tracing::{debug, info};

/// Default fraction of rows held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default seed for the randomized split.
pub const DEFAULT_SEED: u64 = 42;

/// Name of the row-identifier column the harness attaches before splitting.
pub(crate) const ROW_ID_COLUMN: &str = "__row_id";

/// Compares a model's performance on raw versus filtered data.
///
/// The protocol guards against data leakage by splitting first and fitting
/// the preprocessor on the training partition only; the test partition never
/// influences the learned bounds. Model and preprocessor are cloned fresh
/// before every fit so no state crosses between the raw and processed
/// branches.
///
/// # Example
///
/// ```rust,ignore
/// use rowsieve_eval::{ComparisonHarness, RidgeRegressor};
/// use rowsieve_filtering::IqrOutlierRemover;
///
/// let mut harness = ComparisonHarness::new(Box::new(RidgeRegressor::default()))
///     .with_preprocessor(Box::new(IqrOutlierRemover::new(["price"])));
/// let report = harness.compare(&features, &target)?;
/// println!("{report}");
/// ```
pub struct ComparisonHarness {
    model: Box<dyn Model>,
    preprocessor: Option<Box<dyn Preprocessor>>,
    last_report: Option<ComparisonReport>,
}

// The harness may be handed off to a worker thread by callers.
static_assertions::assert_impl_all!(ComparisonHarness: Send);

impl ComparisonHarness {
    /// Create a harness that only evaluates the raw branch.
    pub fn new(model: Box<dyn Model>) -> Self {
        Self {
            model,
            preprocessor: None,
            last_report: None,
        }
    }

    /// Add a preprocessor, enabling the processed branch.
    pub fn with_preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// The report produced by the most recent `compare` call.
    pub fn last_report(&self) -> Option<&ComparisonReport> {
        self.last_report.as_ref()
    }

    /// Run the comparison with the default test fraction and seed.
    pub fn compare(&mut self, x: &DataFrame, y: &Series) -> Result<ComparisonReport> {
        self.compare_with(x, y, DEFAULT_TEST_FRACTION, DEFAULT_SEED)
    }

    /// Run the comparison with an explicit test fraction and seed.
    ///
    /// Protocol, in order: split once; fit and score a fresh model clone on
    /// the raw partitions; if a preprocessor is present, fit a fresh clone
    /// of it on the training partition only, transform both partitions
    /// independently, re-align labels to the surviving row identifiers, and
    /// fit/score another fresh model clone on the filtered partitions.
    ///
    /// A partition filtered down to zero rows surfaces the model's error
    /// unmodified. The previous report is overwritten.
    pub fn compare_with(
        &mut self,
        x: &DataFrame,
        y: &Series,
        test_fraction: f64,
        seed: u64,
    ) -> Result<ComparisonReport> {
        if x.get_column_names()
            .iter()
            .any(|name| name.as_str() == ROW_ID_COLUMN)
        {
            return Err(EvalError::ReservedColumn(ROW_ID_COLUMN.to_string()));
        }

        let keyed = attach_row_ids(x)?;
        let split = train_test_split(&keyed, y, test_fraction, seed)?;
        info!(
            "Comparing on {} train / {} test rows (test fraction {}, seed {})",
            split.x_train.height(),
            split.x_test.height(),
            test_fraction,
            seed
        );

        let mut branches = Vec::with_capacity(2);

        let mut raw_model = self.model.fresh_clone();
        raw_model.fit(&features_of(&split.x_train)?, &split.y_train)?;
        let raw_score = raw_model.score(&features_of(&split.x_test)?, &split.y_test)?;
        debug!("Raw branch score: {raw_score}");
        branches.push(BranchOutcome {
            dataset: BranchLabel::Raw,
            score: raw_score,
            train_rows: split.x_train.height(),
            test_rows: split.x_test.height(),
        });

        if let Some(preprocessor) = &self.preprocessor {
            // Fitted on the training partition only; the test partition must
            // never influence the learned bounds.
            let mut fitted = preprocessor.fresh_clone();
            fitted.fit(&split.x_train)?;

            let x_train_kept = fitted.transform(&split.x_train)?;
            let x_test_kept = fitted.transform(&split.x_test)?;
            debug!(
                "Filtering kept {}/{} train rows and {}/{} test rows",
                x_train_kept.height(),
                split.x_train.height(),
                x_test_kept.height(),
                split.x_test.height()
            );

            let y_train_kept = align_labels(&x_train_kept, &split.x_train, &split.y_train)?;
            let y_test_kept = align_labels(&x_test_kept, &split.x_test, &split.y_test)?;

            let mut processed_model = self.model.fresh_clone();
            processed_model.fit(&features_of(&x_train_kept)?, &y_train_kept)?;
            let processed_score =
                processed_model.score(&features_of(&x_test_kept)?, &y_test_kept)?;
            debug!("Processed branch score: {processed_score}");
            branches.push(BranchOutcome {
                dataset: BranchLabel::Processed,
                score: processed_score,
                train_rows: x_train_kept.height(),
                test_rows: x_test_kept.height(),
            });
        }

        let report = ComparisonReport::new(branches);
        self.last_report = Some(report.clone());
        Ok(report)
    }
}

/// Attach a `u32` row-identifier column so labels can be re-joined after a
/// row-count-changing transform.
fn attach_row_ids(x: &DataFrame) -> Result<DataFrame> {
    let ids: Vec<IdxSize> = (0..x.height() as IdxSize).collect();
    let mut keyed = x.clone();
    keyed.with_column(Series::new(ROW_ID_COLUMN.into(), ids))?;
    Ok(keyed)
}

/// The partition without its row-identifier column, as seen by the model.
fn features_of(partition: &DataFrame) -> Result<DataFrame> {
    Ok(partition.drop(ROW_ID_COLUMN)?)
}

/// Re-align a label series to the rows surviving a transform.
///
/// Surviving row identifiers are looked up in the source partition to
/// recover their positions, and the labels are taken by position. Every
/// surviving identifier must come from the source partition; a transform
/// that invents rows is an internal contract violation.
fn align_labels(filtered: &DataFrame, source: &DataFrame, labels: &Series) -> Result<Series> {
    let source_ids = source.column(ROW_ID_COLUMN)?.as_materialized_series().u32()?;
    let mut position_by_id: HashMap<IdxSize, IdxSize> =
        HashMap::with_capacity(source_ids.len());
    for (position, id) in source_ids.into_iter().enumerate() {
        let id = id.ok_or_else(|| EvalError::Internal("null row identifier".to_string()))?;
        position_by_id.insert(id, position as IdxSize);
    }

    let kept_ids = filtered.column(ROW_ID_COLUMN)?.as_materialized_series().u32()?;
    let mut positions = Vec::with_capacity(kept_ids.len());
    for id in kept_ids.into_iter() {
        let id = id.ok_or_else(|| EvalError::Internal("null row identifier".to_string()))?;
        let position = position_by_id.get(&id).copied().ok_or_else(|| {
            EvalError::Internal(format!(
                "row identifier {id} not present in the source partition"
            ))
        })?;
        positions.push(position);
    }

    Ok(labels.take(&IdxCa::from_vec("idx".into(), positions))?)
}
