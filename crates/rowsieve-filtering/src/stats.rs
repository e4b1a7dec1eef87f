//! Column statistics used by the bounds estimators.
//!
//! Degenerate inputs are surfaced, not corrected: an empty column yields a
//! NaN mean/quantile, and a column with fewer than two values yields a NaN
//! standard deviation. The NaN propagates into the computed bounds, where
//! every membership comparison fails and filtering removes all rows;
//! downstream consumers can detect the non-finite bounds and react.

use crate::error::Result;
use polars::prelude::*;

/// Extract the non-null values of a column as `f64`.
pub(crate) fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    Ok(values)
}

/// Arithmetic mean. NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// NaN when fewer than two values are present, since the statistic is
/// undefined there.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return f64::NAN;
    }

    let mean = mean(values);
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Quantile by linear interpolation between order statistics.
///
/// The target position is `(n - 1) * q`; a fractional position interpolates
/// linearly between the two neighboring sorted values. NaN for an empty
/// slice. `q` is expected in `[0, 1]`.
pub(crate) fn quantile_linear(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let position = (sorted.len() - 1) as f64 * q;
    let lower_idx = position.floor() as usize;
    let upper_idx = position.ceil() as usize;

    if lower_idx == upper_idx {
        return sorted[lower_idx];
    }

    let weight = position - lower_idx as f64;
    sorted[lower_idx] + weight * (sorted[upper_idx] - sorted[lower_idx])
}
