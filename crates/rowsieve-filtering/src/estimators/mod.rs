//! Bounds estimators.
//!
//! Two interchangeable variants compute per-column admissible ranges from a
//! reference table: [`StdOutlierRemover`] centers the range on the mean and
//! widens it by a multiple of the sample standard deviation;
//! [`IqrOutlierRemover`] anchors on the quartiles and widens by a multiple
//! of the interquartile range. Both reject rows through the shared
//! [`RowFilter`](crate::filter::RowFilter), so they differ only in how the
//! ranges are computed.

mod iqr;
mod std_dev;

pub use iqr::{DEFAULT_IQR_FACTOR, IqrOutlierRemover};
pub use std_dev::{DEFAULT_STD_FACTOR, StdOutlierRemover};

use crate::bounds::{BoundsMap, ColumnBounds};
use crate::config::BoundsConfig;
use crate::error::{FilterError, Result};
use crate::stats;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;

/// A row-subsetting transform with a fit/transform lifecycle.
///
/// Anything that learns state from a reference table and then produces
/// row-subsets of later tables can stand in for a bounds estimator; the
/// comparison harness only relies on this capability set.
pub trait Preprocessor: Send {
    /// Learn state from the reference table. Does not mutate the input;
    /// refitting overwrites previously learned state.
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    /// Produce a new table containing a subset of the input rows.
    ///
    /// Returns [`FilterError::NotFitted`] when called before `fit`.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    /// An independent copy with the same configuration and no fitted state.
    fn fresh_clone(&self) -> Box<dyn Preprocessor>;
}

/// A preprocessor whose learned state is a set of per-column bounds.
pub trait BoundsEstimator: Preprocessor {
    /// The fitted bounds, or `None` before the first fit.
    fn bounds(&self) -> Option<&BoundsMap>;
}

/// Compute bounds for every monitored column of `df`.
///
/// Validates the configuration on the way in, then resolves each monitored
/// column (failing fast with the offending name), extracts its non-null
/// numeric values and maps them through `range_for`.
pub(crate) fn fit_bounds<F>(
    df: &DataFrame,
    config: &BoundsConfig,
    range_for: F,
) -> Result<BoundsMap>
where
    F: Fn(&[f64]) -> (f64, f64),
{
    config.validate()?;

    let mut bounds = BoundsMap::with_capacity(config.columns.len());
    for col_name in &config.columns {
        let col = df
            .column(col_name)
            .map_err(|_| FilterError::ColumnNotFound(col_name.clone()))?;
        let series = col.as_materialized_series();

        if !is_numeric_dtype(series.dtype()) {
            return Err(FilterError::NonNumericColumn {
                column: col_name.clone(),
                dtype: series.dtype().to_string(),
            });
        }

        let values = stats::numeric_values(series)?;
        let (lower, upper) = range_for(&values);
        bounds.insert(col_name.clone(), ColumnBounds::new(lower, upper));
    }

    Ok(bounds)
}
