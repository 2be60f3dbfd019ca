//! Imputation module for handling missing values.
//!
//! Each column gets one strategy, picked by name:
//! - median for the columns in [`MEDIAN_COLUMNS`]
//! - mean for the columns in [`MEAN_COLUMNS`]
//! - mode for every other column

mod statistical;

pub use statistical::StatisticalImputer;

use crate::error::Result;
use crate::utils::{column_names, is_numeric_dtype, nans_to_nulls};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Columns filled with their own median.
pub const MEDIAN_COLUMNS: [&str; 20] = [
    "risk_grade",
    "mo_sin_old_il_acct",
    "bc_util",
    "int_rate",
    "installment",
    "fico_range_low",
    "fico_range_high",
    "mths_since_last_delinq",
    "open_acc",
    "total_acc",
    "open_act_il",
    "il_util",
    "open_rv_24m",
    "acc_open_past_24mths",
    "mo_sin_old_rev_tl_op",
    "mths_since_recent_inq",
    "num_actv_rev_tl",
    "num_bc_sats",
    "num_bc_tl",
    "num_sats",
];

/// Columns filled with their own mean.
pub const MEAN_COLUMNS: [&str; 4] = [
    "revol_util",
    "all_util",
    "mths_since_recent_revol_delinq",
    "months_since_earliest_cr",
];

/// Statistic used to fill a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputationStrategy {
    Median,
    Mean,
    Mode,
}

impl ImputationStrategy {
    /// Strategy assigned to a column name.
    pub fn for_column(name: &str) -> Self {
        if MEDIAN_COLUMNS.contains(&name) {
            Self::Median
        } else if MEAN_COLUMNS.contains(&name) {
            Self::Mean
        } else {
            Self::Mode
        }
    }
}

/// A column the imputer filled, with the step it recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub column: String,
    pub strategy: ImputationStrategy,
    pub description: String,
}

/// Fills every column that has missing values, one column at a time.
pub struct ColumnImputer;

impl ColumnImputer {
    /// Impute all columns in place, recording one step per filled column.
    ///
    /// Float NaN is treated as missing and turned into null first. Columns
    /// without missing values are left untouched, dtype included. A median or
    /// mean column that is not numeric falls back to mode. Returns the filled
    /// columns in table order; a column with no observed value to fill from
    /// is left out.
    pub fn impute(
        df: &mut DataFrame,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<ImputedColumn>> {
        Self::impute_with_progress(df, processing_steps, |_, _, _| {})
    }

    /// Same as [`impute`](Self::impute), calling `on_column(index, total, name)`
    /// before each column is filled.
    pub fn impute_with_progress<F>(
        df: &mut DataFrame,
        processing_steps: &mut Vec<String>,
        mut on_column: F,
    ) -> Result<Vec<ImputedColumn>>
    where
        F: FnMut(usize, usize, &str),
    {
        let nans = nans_to_nulls(df)?;
        if nans > 0 {
            debug!("Treating {} NaN values as missing", nans);
        }

        let columns_with_missing: Vec<String> = column_names(df)
            .into_iter()
            .filter(|name| df.column(name).is_ok_and(|col| col.null_count() > 0))
            .collect();

        if columns_with_missing.is_empty() {
            info!("No missing values to impute");
            return Ok(Vec::new());
        }

        debug!(
            "Processing {} columns with missing values",
            columns_with_missing.len()
        );

        let total = columns_with_missing.len();
        let mut imputed = Vec::with_capacity(total);
        for (index, col_name) in columns_with_missing.iter().enumerate() {
            on_column(index, total, col_name);

            let numeric = is_numeric_dtype(df.column(col_name)?.dtype());
            let strategy = match ImputationStrategy::for_column(col_name) {
                ImputationStrategy::Mode => ImputationStrategy::Mode,
                _ if !numeric => {
                    warn!("Column '{}' is not numeric; imputing with mode", col_name);
                    ImputationStrategy::Mode
                }
                other => other,
            };
            debug!("Strategy for '{}': {:?}", col_name, strategy);

            let steps_before = processing_steps.len();
            match strategy {
                ImputationStrategy::Median => {
                    StatisticalImputer::apply_numeric_median(df, col_name, processing_steps)?
                }
                ImputationStrategy::Mean => {
                    StatisticalImputer::apply_numeric_mean(df, col_name, processing_steps)?
                }
                ImputationStrategy::Mode => {
                    StatisticalImputer::apply_mode_imputation(df, col_name, processing_steps)?
                }
            }

            if let Some(step) = processing_steps[steps_before..].last() {
                imputed.push(ImputedColumn {
                    column: col_name.clone(),
                    strategy,
                    description: step.clone(),
                });
            }
        }

        info!("Imputed {} of {} columns", imputed.len(), total);
        Ok(imputed)
    }
}
