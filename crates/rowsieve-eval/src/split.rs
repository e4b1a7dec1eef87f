//! Seeded randomized train/test splitting.

use crate::error::{EvalError, Result};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// The four partitions produced by [`train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Series,
    pub y_test: Series,
}

/// Randomly partition `(x, y)` into train and test sets.
///
/// The test partition gets `ceil(rows * test_fraction)` rows; both
/// partitions must end up non-empty or the split is rejected as
/// infeasible. The shuffle is driven by a seeded RNG, so equal seeds
/// reproduce identical partitions.
pub fn train_test_split(
    x: &DataFrame,
    y: &Series,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let rows = x.height();
    if rows != y.len() {
        return Err(EvalError::LengthMismatch {
            rows,
            labels: y.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(EvalError::InfeasibleSplit {
            rows,
            test_fraction,
        });
    }

    let test_rows = (rows as f64 * test_fraction).ceil() as usize;
    if test_rows == 0 || test_rows >= rows {
        return Err(EvalError::InfeasibleSplit {
            rows,
            test_fraction,
        });
    }

    let mut indices: Vec<IdxSize> = (0..rows as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_idx = IdxCa::from_vec("idx".into(), indices[..test_rows].to_vec());
    let train_idx = IdxCa::from_vec("idx".into(), indices[test_rows..].to_vec());

    debug!(
        "Split {} rows into {} train / {} test (seed {})",
        rows,
        rows - test_rows,
        test_rows,
        seed
    );

    Ok(TrainTestSplit {
        x_train: x.take(&train_idx)?,
        x_test: x.take(&test_idx)?,
        y_train: y.take(&train_idx)?,
        y_test: y.take(&test_idx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ten_rows() -> (DataFrame, Series) {
        let df = df![
            "i" => (0..10).map(|v| v as f64).collect::<Vec<_>>(),
        ]
        .unwrap();
        let y = Series::new("y".into(), (0..10).map(|v| v as f64 * 2.0).collect::<Vec<_>>());
        (df, y)
    }

    #[test]
    fn test_split_counts_with_defaults() {
        let (df, y) = ten_rows();
        let split = train_test_split(&df, &y, 0.2, 42).unwrap();

        assert_eq!(split.x_train.height(), 8);
        assert_eq!(split.x_test.height(), 2);
        assert_eq!(split.y_train.len(), 8);
        assert_eq!(split.y_test.len(), 2);
    }

    #[test]
    fn test_split_test_fraction_rounds_up() {
        let df = df![
            "i" => [0.0, 1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap();
        let y = Series::new("y".into(), &[0.0f64, 1.0, 2.0, 3.0, 4.0]);

        let split = train_test_split(&df, &y, 0.5, 0).unwrap();
        assert_eq!(split.x_test.height(), 3);
        assert_eq!(split.x_train.height(), 2);
    }

    #[test]
    fn test_split_same_seed_is_deterministic() {
        let (df, y) = ten_rows();

        let first = train_test_split(&df, &y, 0.2, 42).unwrap();
        let second = train_test_split(&df, &y, 0.2, 42).unwrap();

        assert!(first.x_train.equals(&second.x_train));
        assert!(first.x_test.equals(&second.x_test));
        assert!(first.y_train.equals(&second.y_train));
        assert!(first.y_test.equals(&second.y_test));
    }

    #[test]
    fn test_split_covers_all_rows_exactly_once() {
        let (df, y) = ten_rows();
        let split = train_test_split(&df, &y, 0.3, 7).unwrap();

        let mut seen: Vec<f64> = Vec::new();
        for part in [&split.x_train, &split.x_test] {
            let col = part.column("i").unwrap().f64().unwrap();
            seen.extend(col.into_no_null_iter());
        }
        seen.sort_by(|a, b| a.total_cmp(b));

        let expected: Vec<f64> = (0..10).map(|v| v as f64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_split_labels_stay_aligned_with_rows() {
        let (df, y) = ten_rows();
        let split = train_test_split(&df, &y, 0.2, 42).unwrap();

        // y was built as 2 * i, so alignment survives the shuffle iff the
        // pairing holds in both partitions.
        for (part, labels) in [
            (&split.x_train, &split.y_train),
            (&split.x_test, &split.y_test),
        ] {
            let xs = part.column("i").unwrap().f64().unwrap();
            let ys = labels.f64().unwrap();
            for (x_val, y_val) in xs.into_no_null_iter().zip(ys.into_no_null_iter()) {
                assert_eq!(y_val, x_val * 2.0);
            }
        }
    }

    #[test]
    fn test_split_length_mismatch_errors() {
        let (df, _) = ten_rows();
        let y = Series::new("y".into(), &[1.0f64, 2.0]);

        assert!(matches!(
            train_test_split(&df, &y, 0.2, 42),
            Err(EvalError::LengthMismatch { rows: 10, labels: 2 })
        ));
    }

    #[test]
    fn test_split_rejects_degenerate_fractions() {
        let (df, y) = ten_rows();

        assert!(matches!(
            train_test_split(&df, &y, 0.0, 42),
            Err(EvalError::InfeasibleSplit { .. })
        ));
        assert!(matches!(
            train_test_split(&df, &y, 1.0, 42),
            Err(EvalError::InfeasibleSplit { .. })
        ));
    }

    #[test]
    fn test_split_rejects_too_few_rows() {
        let df = df![
            "i" => [1.0],
        ]
        .unwrap();
        let y = Series::new("y".into(), &[1.0f64]);

        assert!(matches!(
            train_test_split(&df, &y, 0.2, 42),
            Err(EvalError::InfeasibleSplit { rows: 1, .. })
        ));
    }
}
