//! Model abstraction consumed by the comparison harness.
//!
//! The harness only needs three capabilities from a model: an independent
//! unfit copy, fitting on a feature table plus label series, and scoring a
//! held-out partition. [`RidgeRegressor`] is the reference implementation:
//! a linear model solved by normal equations, enough to make before/after
//! comparisons meaningful without pulling in a training framework.

use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rowsieve_filtering::is_numeric_dtype;
use thiserror::Error;
use tracing::debug;

/// Errors raised while fitting or scoring a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// `score` (or `predict`) was called before `fit`.
    #[error("Model has not been fitted; call fit before scoring")]
    NotFitted,

    /// Fitting or scoring was attempted on a partition with zero rows.
    #[error("Cannot fit or score on an empty partition")]
    EmptyPartition,

    /// The feature table has no columns.
    #[error("No feature columns to fit on")]
    NoFeatureColumns,

    /// A feature column does not hold numeric values.
    #[error("Feature column '{column}' has non-numeric dtype {dtype}")]
    NonNumericFeature { column: String, dtype: String },

    /// The target series does not hold numeric values.
    #[error("Target has non-numeric dtype {dtype}")]
    NonNumericTarget { dtype: String },

    /// The scored table has a different number of features than the fitted one.
    #[error("Expected {expected} feature columns, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    /// The normal-equation system could not be solved.
    #[error("Linear system is singular; cannot solve for coefficients")]
    SingularSystem,

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// A trainable, scoreable model.
///
/// `fresh_clone` must return an independent copy with no fitted state;
/// the harness clones the model before every fit so that no state leaks
/// between the raw and processed branches.
pub trait Model: Send {
    /// An independent, unfit copy of this model.
    fn fresh_clone(&self) -> Box<dyn Model>;

    /// Fit the model on a feature table and an aligned label series.
    fn fit(&mut self, features: &DataFrame, target: &Series) -> Result<(), ModelError>;

    /// Score the fitted model on a partition; higher is better.
    fn score(&self, features: &DataFrame, target: &Series) -> Result<f64, ModelError>;
}

/// Coefficients learned by [`RidgeRegressor::fit`].
#[derive(Debug, Clone)]
struct FittedCoefficients {
    weights: Array1<f64>,
    bias: f64,
}

/// Linear regression with L2 regularization, solved by normal equations.
///
/// Features and target are centered, `(XᵀX + αI) w = Xᵀy` is solved by
/// Gaussian elimination with partial pivoting, and the intercept is
/// recovered from the means. The default `alpha` is small enough to leave
/// well-conditioned problems effectively unregularized while keeping the
/// system solvable when columns are collinear.
///
/// `score` is the coefficient of determination R² on the given partition.
/// A constant target has zero total variance, which leaves R² undefined;
/// the returned value is NaN in that case rather than a clamped stand-in.
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    alpha: f64,
    fitted: Option<FittedCoefficients>,
}

impl RidgeRegressor {
    /// Create a regressor with an explicit regularization strength.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            fitted: None,
        }
    }
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl Model for RidgeRegressor {
    fn fresh_clone(&self) -> Box<dyn Model> {
        Box::new(Self::new(self.alpha))
    }

    fn fit(&mut self, features: &DataFrame, target: &Series) -> Result<(), ModelError> {
        let x = feature_matrix(features)?;
        let y = target_vector(target)?;

        if x.nrows() == 0 {
            return Err(ModelError::EmptyPartition);
        }
        if x.ncols() == 0 {
            return Err(ModelError::NoFeatureColumns);
        }

        // Center both sides so the intercept drops out of the system.
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyPartition)?;
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = &x - &x_mean;
        let y_centered = &y - y_mean;

        let mut gram = x_centered.t().dot(&x_centered);
        for i in 0..gram.nrows() {
            gram[[i, i]] += self.alpha;
        }
        let moment = x_centered.t().dot(&y_centered);

        let weights = solve_linear_system(&gram, &moment)?;
        let bias = y_mean - weights.dot(&x_mean);

        debug!(
            "Fitted ridge regressor on {} rows x {} features",
            x.nrows(),
            x.ncols()
        );
        self.fitted = Some(FittedCoefficients { weights, bias });
        Ok(())
    }

    fn score(&self, features: &DataFrame, target: &Series) -> Result<f64, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotFitted)?;

        let x = feature_matrix(features)?;
        let y = target_vector(target)?;
        if x.nrows() == 0 {
            return Err(ModelError::EmptyPartition);
        }
        if x.ncols() != fitted.weights.len() {
            return Err(ModelError::FeatureMismatch {
                expected: fitted.weights.len(),
                got: x.ncols(),
            });
        }

        let predictions = x.dot(&fitted.weights) + fitted.bias;

        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(obs, pred)| (obs - pred).powi(2))
            .sum();
        let ss_tot: f64 = y.iter().map(|obs| (obs - y_mean).powi(2)).sum();

        if ss_tot == 0.0 {
            return Ok(f64::NAN);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// Convert a feature table to a row-major `f64` matrix.
///
/// Null entries become NaN and flow into the solver unmasked.
fn feature_matrix(df: &DataFrame) -> Result<Array2<f64>, ModelError> {
    let mut matrix = Array2::zeros((df.height(), df.width()));
    for (j, col) in df.get_columns().iter().enumerate() {
        let series = col.as_materialized_series();
        if !is_numeric_dtype(series.dtype()) {
            return Err(ModelError::NonNumericFeature {
                column: series.name().to_string(),
                dtype: series.dtype().to_string(),
            });
        }
        let float_series = series.cast(&DataType::Float64)?;
        for (i, value) in float_series.f64()?.into_iter().enumerate() {
            matrix[[i, j]] = value.unwrap_or(f64::NAN);
        }
    }
    Ok(matrix)
}

/// Convert a label series to an `f64` vector.
fn target_vector(series: &Series) -> Result<Array1<f64>, ModelError> {
    if !is_numeric_dtype(series.dtype()) {
        return Err(ModelError::NonNumericTarget {
            dtype: series.dtype().to_string(),
        });
    }
    let float_series = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    Ok(Array1::from_vec(values))
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = a.nrows();
    let mut augmented = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            augmented[[i, j]] = a[[i, j]];
        }
        augmented[[i, n]] = b[i];
    }

    for i in 0..n {
        // Pivot on the largest remaining entry in this column.
        let mut pivot_row = i;
        for k in (i + 1)..n {
            if augmented[[k, i]].abs() > augmented[[pivot_row, i]].abs() {
                pivot_row = k;
            }
        }
        if pivot_row != i {
            for j in 0..=n {
                augmented.swap([i, j], [pivot_row, j]);
            }
        }

        let pivot = augmented[[i, i]];
        if !pivot.is_finite() || pivot.abs() < 1e-12 {
            return Err(ModelError::SingularSystem);
        }

        for k in (i + 1)..n {
            let factor = augmented[[k, i]] / pivot;
            for j in i..=n {
                augmented[[k, j]] -= factor * augmented[[i, j]];
            }
        }
    }

    let mut solution = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut accum = augmented[[i, n]];
        for j in (i + 1)..n {
            accum -= augmented[[i, j]] * solution[j];
        }
        solution[i] = accum / augmented[[i, i]];
    }

    Ok(solution)
}
