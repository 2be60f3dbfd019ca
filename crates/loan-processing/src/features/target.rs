//! Collapses the loan status column into a binary repaid/not-repaid outcome.

use crate::error::Result;
use crate::utils::require_series;
use polars::prelude::*;

/// Status values counted as a good outcome. Membership is exact.
pub const GOOD_STATUSES: [&str; 2] = [
    "Fully Paid",
    "Does not meet the credit policy. Status:Fully Paid",
];

/// Maps a status column to `1` for a good outcome and `0` otherwise.
pub struct TargetBinarizer;

impl TargetBinarizer {
    /// Whether a status value is one of [`GOOD_STATUSES`].
    pub fn is_good_status(status: &str) -> bool {
        GOOD_STATUSES.contains(&status)
    }

    /// Replace `target` with an `Int32` 0/1 column. Nulls and unrecognized
    /// values become 0.
    ///
    /// # Errors
    ///
    /// `MissingColumn` if `target` is absent.
    pub fn binarize(mut df: DataFrame, target: &str) -> Result<DataFrame> {
        let status = require_series(&df, target)?.cast(&DataType::String)?;
        let outcome: Vec<i32> = status
            .str()?
            .into_iter()
            .map(|value| i32::from(value.is_some_and(Self::is_good_status)))
            .collect();

        df.with_column(Series::new(target.into(), outcome))?;
        Ok(df)
    }
}
