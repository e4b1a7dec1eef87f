//! Standard-deviation bounds estimator.

use super::{BoundsEstimator, Preprocessor, fit_bounds};
use crate::bounds::BoundsMap;
use crate::config::BoundsConfig;
use crate::error::{FilterError, Result};
use crate::filter::RowFilter;
use crate::stats;
use polars::prelude::*;
use tracing::debug;

/// Default multiplier for the standard deviation.
pub const DEFAULT_STD_FACTOR: f64 = 3.0;

/// Removes rows whose monitored values fall outside `mean ± factor * std`.
///
/// `fit` computes, per monitored column, the mean and the sample standard
/// deviation over the entire input table (no row exclusion). A column with
/// fewer than two non-null values has an undefined standard deviation, so
/// its bounds are NaN and a subsequent transform removes every row.
///
/// # Example
///
/// ```rust,ignore
/// use rowsieve_filtering::{Preprocessor, StdOutlierRemover};
///
/// let mut remover = StdOutlierRemover::new(["price"]).with_factor(2.0);
/// remover.fit(&df)?;
/// let cleaned = remover.transform(&df)?;
/// ```
pub struct StdOutlierRemover {
    config: BoundsConfig,
    bounds_: Option<BoundsMap>,
}

impl StdOutlierRemover {
    /// Create an estimator monitoring `columns` with the default factor.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(BoundsConfig::new(columns, DEFAULT_STD_FACTOR))
    }

    /// Create an estimator from an explicit configuration.
    pub fn from_config(config: BoundsConfig) -> Self {
        Self {
            config,
            bounds_: None,
        }
    }

    /// Replace the standard-deviation multiplier.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.config.factor = factor;
        self
    }

    pub fn config(&self) -> &BoundsConfig {
        &self.config
    }
}

impl Preprocessor for StdOutlierRemover {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let factor = self.config.factor;
        let bounds = fit_bounds(df, &self.config, |values| {
            let center = stats::mean(values);
            let spread = stats::sample_std(values) * factor;
            (center - spread, center + spread)
        })?;

        debug!(
            "Fitted std-dev bounds for {} columns over {} rows",
            bounds.len(),
            df.height()
        );
        self.bounds_ = Some(bounds);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let bounds = self.bounds_.as_ref().ok_or(FilterError::NotFitted)?;
        RowFilter::apply(df, &self.config.columns, bounds)
    }

    fn fresh_clone(&self) -> Box<dyn Preprocessor> {
        Box::new(Self::from_config(self.config.clone()))
    }
}

impl BoundsEstimator for StdOutlierRemover {
    fn bounds(&self) -> Option<&BoundsMap> {
        self.bounds_.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outlier_df() -> DataFrame {
        df![
            "value" => [1.0, 2.0, 3.0, 4.0, 100.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_fit_computes_mean_and_sample_std_bounds() {
        // Mean = 22, sample std = sqrt(1902.5); factor 1 gives
        // bounds [22 - std, 22 + std].
        let mut remover = StdOutlierRemover::new(["value"]).with_factor(1.0);
        remover.fit(&outlier_df()).unwrap();

        let std = 1902.5f64.sqrt();
        let bounds = remover.bounds().unwrap().get("value").unwrap();
        assert!((bounds.lower - (22.0 - std)).abs() < 1e-9);
        assert!((bounds.upper - (22.0 + std)).abs() < 1e-9);
    }

    #[test]
    fn test_transform_excludes_extreme_value() {
        // Bounds ~ [-21.6, 65.6]: 100 is out, 1 through 4 stay.
        let mut remover = StdOutlierRemover::new(["value"]).with_factor(1.0);
        remover.fit(&outlier_df()).unwrap();

        let filtered = remover.transform(&outlier_df()).unwrap();

        assert_eq!(filtered.height(), 4);
        let max = filtered.column("value").unwrap().f64().unwrap().max();
        assert_eq!(max, Some(4.0));
    }

    #[test]
    fn test_default_factor_keeps_everything_here() {
        // With factor 3.0 the upper bound is ~152.9, so even 100 survives.
        let mut remover = StdOutlierRemover::new(["value"]);
        remover.fit(&outlier_df()).unwrap();

        let filtered = remover.transform(&outlier_df()).unwrap();
        assert_eq!(filtered.height(), 5);
    }

    #[test]
    fn test_transform_before_fit_errors() {
        let remover = StdOutlierRemover::new(["value"]);
        let result = remover.transform(&outlier_df());
        assert!(matches!(result, Err(FilterError::NotFitted)));
    }

    #[test]
    fn test_fit_missing_column_errors() {
        let mut remover = StdOutlierRemover::new(["missing"]);
        let result = remover.fit(&outlier_df());
        assert!(matches!(result, Err(FilterError::ColumnNotFound(name)) if name == "missing"));
    }

    #[test]
    fn test_fit_non_numeric_column_errors() {
        let df = df![
            "label" => ["a", "b", "c"],
        ]
        .unwrap();

        let mut remover = StdOutlierRemover::new(["label"]);
        let result = remover.fit(&df);
        assert!(matches!(result, Err(FilterError::NonNumericColumn { .. })));
    }

    #[test]
    fn test_refit_overwrites_bounds() {
        let mut remover = StdOutlierRemover::new(["value"]).with_factor(1.0);
        remover.fit(&outlier_df()).unwrap();
        let first_upper = remover.bounds().unwrap().get("value").unwrap().upper;

        let narrow = df![
            "value" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        remover.fit(&narrow).unwrap();
        let second_upper = remover.bounds().unwrap().get("value").unwrap().upper;

        assert!(second_upper < first_upper);
    }

    #[test]
    fn test_constant_column_degenerates_to_point_bounds() {
        let df = df![
            "value" => [5.0, 5.0, 5.0, 5.0],
        ]
        .unwrap();

        let mut remover = StdOutlierRemover::new(["value"]).with_factor(3.0);
        remover.fit(&df).unwrap();

        let bounds = remover.bounds().unwrap().get("value").unwrap();
        assert_eq!(bounds.lower, 5.0);
        assert_eq!(bounds.upper, 5.0);

        // All rows equal the center, so nothing is removed.
        assert_eq!(remover.transform(&df).unwrap().height(), 4);
    }

    #[test]
    fn test_single_row_yields_nan_bounds_and_empty_transform() {
        let df = df![
            "value" => [5.0],
        ]
        .unwrap();

        let mut remover = StdOutlierRemover::new(["value"]);
        remover.fit(&df).unwrap();

        let bounds = remover.bounds().unwrap().get("value").unwrap();
        assert!(!bounds.is_finite());
        assert_eq!(remover.transform(&df).unwrap().height(), 0);
    }

    #[test]
    fn test_fresh_clone_discards_fitted_state() {
        let mut remover = StdOutlierRemover::new(["value"]).with_factor(1.0);
        remover.fit(&outlier_df()).unwrap();

        let clone = remover.fresh_clone();
        assert!(matches!(
            clone.transform(&outlier_df()),
            Err(FilterError::NotFitted)
        ));
    }
}
