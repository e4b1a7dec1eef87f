//! Comparison results.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Which branch of the comparison an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BranchLabel {
    /// Trained and scored on the unmodified split.
    Raw,
    /// Trained and scored on the filtered split.
    Processed,
}

impl BranchLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchLabel::Raw => "Raw",
            BranchLabel::Processed => "Processed",
        }
    }
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and partition sizes actually used by one branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchOutcome {
    pub dataset: BranchLabel,
    pub score: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// The result table of a comparison run: one row per branch, `Raw` first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    branches: Vec<BranchOutcome>,
}

impl ComparisonReport {
    pub(crate) fn new(branches: Vec<BranchOutcome>) -> Self {
        Self { branches }
    }

    /// All recorded branches in insertion order.
    pub fn branches(&self) -> &[BranchOutcome] {
        &self.branches
    }

    /// The raw branch outcome.
    pub fn raw(&self) -> Option<&BranchOutcome> {
        self.branches
            .iter()
            .find(|b| b.dataset == BranchLabel::Raw)
    }

    /// The processed branch outcome, if a preprocessor was supplied.
    pub fn processed(&self) -> Option<&BranchOutcome> {
        self.branches
            .iter()
            .find(|b| b.dataset == BranchLabel::Processed)
    }

    /// Render the report as a one-row-per-branch DataFrame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let datasets: Vec<&str> = self.branches.iter().map(|b| b.dataset.as_str()).collect();
        let scores: Vec<f64> = self.branches.iter().map(|b| b.score).collect();
        let train_rows: Vec<u64> = self.branches.iter().map(|b| b.train_rows as u64).collect();
        let test_rows: Vec<u64> = self.branches.iter().map(|b| b.test_rows as u64).collect();

        df![
            "dataset" => datasets,
            "score" => scores,
            "train_rows" => train_rows,
            "test_rows" => test_rows,
        ]
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let df = self.to_dataframe().map_err(|_| fmt::Error)?;
        write!(f, "{}", df)
    }
}
