//! Statistical imputation methods.
//!
//! Provides median, mean and mode fills for a single column.

use crate::error::Result;
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_numeric_dtype, nan_to_null, numeric_mode, string_mode,
};
use polars::prelude::*;
use tracing::warn;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill nulls with the column median. An entirely missing column is filled with 0.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let median = nan_to_null(Self::series(df, col_name)?)?.median();
        Self::fill_numeric(df, col_name, median, processing_steps, "median")
    }

    /// Fill nulls with the column mean. An entirely missing column is filled with 0.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let mean = nan_to_null(Self::series(df, col_name)?)?.mean();
        Self::fill_numeric(df, col_name, mean, processing_steps, "mean")
    }

    /// Fill nulls with the most frequent value, smallest value on ties.
    ///
    /// Numeric columns stay numeric; anything else is filled as text.
    /// An entirely missing text column is left as is.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = Self::series(df, col_name)?;

        if is_numeric_dtype(series.dtype()) {
            let mode = numeric_mode(series);
            return Self::fill_numeric(df, col_name, mode, processing_steps, "mode");
        }

        match string_mode(series) {
            Some(mode_val) => {
                let filled = fill_string_nulls(series, &mode_val)?;
                df.replace(col_name, filled)?;

                processing_steps.push(format!("Filled '{}' with mode: '{}'", col_name, mode_val));
            }
            None => {
                warn!("Column '{}' has no observed values; leaving it unfilled", col_name);
            }
        }

        Ok(())
    }

    fn series<'a>(df: &'a DataFrame, col_name: &str) -> Result<&'a Series> {
        crate::utils::require_series(df, col_name)
    }

    /// Fill a numeric column with `statistic`, or 0 when it is undefined.
    fn fill_numeric(
        df: &mut DataFrame,
        col_name: &str,
        statistic: Option<f64>,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) -> Result<()> {
        let (fill_value, method) = match statistic {
            Some(value) => (value, method.to_string()),
            None => {
                warn!("Column '{}' has no observed values; filling with 0", col_name);
                (0.0, format!("zero (no observed values for {method})"))
            }
        };

        let filled = fill_numeric_nulls(Self::series(df, col_name)?, fill_value)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with {}: {:.2}",
            col_name, method, fill_value
        ));

        Ok(())
    }
}
