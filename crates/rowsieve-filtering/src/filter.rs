//! Row filtering against fitted bounds.
//!
//! Shared by both bounds estimator variants: the estimators differ only in
//! how bounds are computed, never in how rows are rejected.

use crate::bounds::BoundsMap;
use crate::error::{FilterError, Result};
use polars::prelude::*;
use tracing::debug;

/// Applies per-column bounds to reject outlier rows.
pub struct RowFilter;

impl RowFilter {
    /// Return a new table containing only the rows whose value lies inside
    /// `[lower, upper]` for every monitored column.
    ///
    /// The candidate row set is narrowed one column at a time; since the
    /// surviving set is the conjunction over all columns, the evaluation
    /// order affects intermediate set sizes only, never the result. Columns
    /// not in `columns` are untouched and retained in surviving rows. The
    /// input table is not mutated.
    ///
    /// Rows with a null monitored value fail the membership check and are
    /// excluded, as is every row when a column's bounds are NaN.
    pub fn apply(df: &DataFrame, columns: &[String], bounds: &BoundsMap) -> Result<DataFrame> {
        let original_rows = df.height();
        let mut filtered = df.clone();

        for col_name in columns {
            let column_bounds = bounds
                .get(col_name)
                .ok_or_else(|| FilterError::ColumnNotFound(col_name.clone()))?;

            let col = filtered
                .column(col_name)
                .map_err(|_| FilterError::ColumnNotFound(col_name.clone()))?;
            let series = col.as_materialized_series();
            let float_series = series.cast(&DataType::Float64)?;
            let f64_chunked = float_series.f64()?;

            let mut mask_values = Vec::with_capacity(f64_chunked.len());
            for opt_val in f64_chunked.into_iter() {
                let keep = opt_val.is_some_and(|val| column_bounds.contains(val));
                mask_values.push(keep);
            }

            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            filtered = filtered.filter(&mask)?;
        }

        debug!(
            "Filtered {} of {} rows across {} monitored columns",
            original_rows - filtered.height(),
            original_rows,
            columns.len()
        );

        Ok(filtered)
    }
}
