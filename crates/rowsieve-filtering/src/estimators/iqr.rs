//! Interquartile-range bounds estimator.

use super::{BoundsEstimator, Preprocessor, fit_bounds};
use crate::bounds::BoundsMap;
use crate::config::BoundsConfig;
use crate::error::{FilterError, Result};
use crate::filter::RowFilter;
use crate::stats;
use polars::prelude::*;
use tracing::debug;

/// Default multiplier for the interquartile range.
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;

/// Removes rows whose monitored values fall outside
/// `[Q1 - factor * IQR, Q3 + factor * IQR]`.
///
/// Quartiles are computed with linear interpolation between order
/// statistics, which pins down bound reproducibility across refits. An
/// empty monitored column yields NaN quartiles and therefore NaN bounds; a
/// subsequent transform removes every row.
pub struct IqrOutlierRemover {
    config: BoundsConfig,
    bounds_: Option<BoundsMap>,
}

impl IqrOutlierRemover {
    /// Create an estimator monitoring `columns` with the default factor.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(BoundsConfig::new(columns, DEFAULT_IQR_FACTOR))
    }

    /// Create an estimator from an explicit configuration.
    pub fn from_config(config: BoundsConfig) -> Self {
        Self {
            config,
            bounds_: None,
        }
    }

    /// Replace the IQR multiplier.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.config.factor = factor;
        self
    }

    pub fn config(&self) -> &BoundsConfig {
        &self.config
    }
}

impl Preprocessor for IqrOutlierRemover {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let factor = self.config.factor;
        let bounds = fit_bounds(df, &self.config, |values| {
            let q1 = stats::quantile_linear(values, 0.25);
            let q3 = stats::quantile_linear(values, 0.75);
            let spread = (q3 - q1) * factor;
            (q1 - spread, q3 + spread)
        })?;

        debug!(
            "Fitted IQR bounds for {} columns over {} rows",
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

impl BoundsEstimator for IqrOutlierRemover {
    fn bounds(&self) -> Option<&BoundsMap> {
        self.bounds_.as_ref()
    }
}
