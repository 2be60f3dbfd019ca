//! Up-front check of the source columns the pipeline reads.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{EARLIEST_CREDIT_LINE, ISSUE_DATE, RAW_CATEGORICAL_COLUMNS};
use crate::utils::require_columns;
use polars::prelude::DataFrame;
use tracing::debug;

/// Verifies that a raw loan table carries every column a run will touch.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Columns a run with `config` reads, in the order they are checked.
    pub fn required_columns(config: &PipelineConfig) -> Vec<&str> {
        let mut required: Vec<&str> = RAW_CATEGORICAL_COLUMNS.to_vec();
        required.push(ISSUE_DATE);
        required.push(EARLIEST_CREDIT_LINE);
        if let Some(target) = config.target_column.as_deref() {
            required.push(target);
        }
        required
    }

    /// # Errors
    ///
    /// `MissingColumn` naming the first required column absent from `df`.
    pub fn validate(df: &DataFrame, config: &PipelineConfig) -> Result<()> {
        let required = Self::required_columns(config);
        require_columns(df, &required)?;
        debug!("Schema check passed for {} required columns", required.len());
        Ok(())
    }
}
