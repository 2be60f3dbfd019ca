//! Column pruning for the loan feature table.
//!
//! This module removes:
//! - columns that are mostly missing
//! - post-origination columns that leak the outcome
//! - hardship and settlement columns
//! - identifiers and free text

mod drop_lists;

pub use drop_lists::{IDENTIFIER_COLUMNS, LEAKAGE_COLUMNS, is_hardship_or_settlement};

use crate::config::DEFAULT_MISSING_COLUMN_THRESHOLD;
use crate::error::{PreprocessingError, Result};
use crate::utils::missing_fraction;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Missing fraction at or above which a column is always dropped.
pub const MISSING_DROP_CUTOFF: f64 = 0.7;

/// Drops mostly-missing, leakage and identifier columns.
///
/// The threshold passed to [`ColumnPruner::with_threshold`] is range-checked
/// but the drop rule always uses [`MISSING_DROP_CUTOFF`]. Callers that relied
/// on this behavior get the same columns regardless of the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPruner {
    threshold: f64,
}

impl Default for ColumnPruner {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MISSING_COLUMN_THRESHOLD,
        }
    }
}

impl ColumnPruner {
    /// # Errors
    ///
    /// `InvalidArgument` if `threshold` is not within `[0, 1]`.
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PreprocessingError::InvalidArgument(format!(
                "Invalid threshold {threshold}. Must be between 0 and 1"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Names of the columns `prune` would remove, in table order.
    pub fn columns_to_drop(&self, df: &DataFrame) -> Vec<String> {
        let fixed: HashSet<&str> = LEAKAGE_COLUMNS
            .iter()
            .chain(IDENTIFIER_COLUMNS.iter())
            .copied()
            .collect();

        df.get_columns()
            .iter()
            .filter(|col| {
                let name = col.name().as_str();
                missing_fraction(col) >= MISSING_DROP_CUTOFF
                    || fixed.contains(name)
                    || is_hardship_or_settlement(name)
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Drop every column selected by [`columns_to_drop`](Self::columns_to_drop).
    ///
    /// Returns the pruned table and the dropped column names.
    pub fn prune(&self, df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let dropped = self.columns_to_drop(&df);

        if dropped.is_empty() {
            debug!("No columns to prune");
            return Ok((df, dropped));
        }

        let df = df.drop_many(dropped.iter().map(String::as_str));
        info!("Pruned {} columns, {} remain", dropped.len(), df.width());
        debug!("Pruned columns: {:?}", dropped);

        Ok((df, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_threshold_validation() {
        for t in [0.0, 0.25, 0.7, 1.0] {
            assert!(ColumnPruner::with_threshold(t).is_ok());
        }
        for t in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = ColumnPruner::with_threshold(t).unwrap_err();
            assert!(matches!(err, PreprocessingError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_prune_drops_each_category() {
        let df = df![
            "loan_amnt" => [1.0, 2.0, 3.0, 4.0],
            "mostly_missing" => [None, None, None, Some(1.0)],
            "seventy_percent" => [Some(1.0), None, None, Some(2.0)],
            "recoveries" => [0.0, 0.0, 0.0, 0.0],
            "hardship_status" => ["a", "b", "c", "d"],
            "settlement_amount" => [1, 2, 3, 4],
            "zip_code" => ["941xx", "100xx", "606xx", "021xx"],
            "earliest_cr_line" => ["Jan-2001", "Feb-2002", "Mar-2003", "Apr-2004"],
        ]
        .unwrap();

        let (pruned, dropped) = ColumnPruner::default().prune(df).unwrap();

        assert_eq!(
            dropped,
            vec![
                "mostly_missing",
                "recoveries",
                "hardship_status",
                "settlement_amount",
                "zip_code",
                "earliest_cr_line",
            ]
        );
        assert_eq!(
            pruned.get_column_names_str(),
            vec!["loan_amnt", "seventy_percent"]
        );
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let df = df![
            "exactly_seventy" => [None, None, None, None, None, None, None, Some(1), Some(2), Some(3)],
            "keep" => [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        ]
        .unwrap();

        let (pruned, dropped) = ColumnPruner::default().prune(df).unwrap();
        assert_eq!(dropped, vec!["exactly_seventy"]);
        assert_eq!(pruned.width(), 1);
    }

    #[test]
    fn test_threshold_does_not_change_drop_rule() {
        let df = df![
            "half_missing" => [Some(1.0), None],
            "all_missing" => [Option::<f64>::None, None],
        ]
        .unwrap();

        let strict = ColumnPruner::with_threshold(0.1).unwrap();
        let lenient = ColumnPruner::with_threshold(1.0).unwrap();
        assert_eq!(strict.columns_to_drop(&df), vec!["all_missing"]);
        assert_eq!(lenient.columns_to_drop(&df), vec!["all_missing"]);
    }

    #[test]
    fn test_absent_columns_are_not_an_error() {
        let df = df!["loan_amnt" => [1.0, 2.0]].unwrap();
        let (pruned, dropped) = ColumnPruner::default().prune(df).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(pruned.width(), 1);
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let df = df!["loan_amnt" => Vec::<f64>::new()].unwrap();
        let (pruned, dropped) = ColumnPruner::default().prune(df).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(pruned.width(), 1);
    }
}
