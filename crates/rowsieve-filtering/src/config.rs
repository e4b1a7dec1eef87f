//! Configuration for the bounds estimators.
//!
//! Monitored columns are referenced by name and validated once, at the first
//! fit, so a typo fails fast with an error naming the offending column
//! instead of surfacing later as a mysterious lookup failure.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// Configuration shared by both bounds estimator variants.
///
/// `columns` lists the numeric columns whose values are checked against the
/// fitted bounds; all other columns pass through filtering untouched.
/// `factor` scales the dispersion statistic (standard deviation or IQR) when
/// widening the admissible range around the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    /// Names of the numeric columns to monitor for outliers.
    pub columns: Vec<String>,

    /// Multiplier applied to the dispersion statistic.
    pub factor: f64,
}

impl BoundsConfig {
    /// Create a new configuration.
    pub fn new<I, S>(columns: I, factor: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            factor,
        }
    }

    /// Validate the configuration and return an error if invalid.
    ///
    /// A zero factor is allowed: it degenerates the admissible range to the
    /// center statistic, which is a legitimate (if aggressive) setting.
    /// Negative or non-finite factors would invert the bounds and are
    /// rejected.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(FilterError::InvalidConfig(
                "at least one monitored column is required".to_string(),
            ));
        }

        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(FilterError::InvalidConfig(format!(
                "factor must be finite and non-negative, got {}",
                self.factor
            )));
        }

        Ok(())
    }
}
