//! Configuration types for the loan preprocessing pipeline.
//!
//! The mappings, column lists and drop rules are domain constants and live
//! next to the stages that use them. This module only carries the few run
//! parameters a caller may choose, using the builder pattern.

use serde::{Deserialize, Serialize};

/// Default missingness threshold accepted by the column pruner.
pub const DEFAULT_MISSING_COLUMN_THRESHOLD: f64 = 0.7;

/// Configuration for the preprocessing pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use loan_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .missing_column_threshold(0.7)
///     .target_column("loan_status")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Threshold handed to the column pruner (0.0 - 1.0).
    ///
    /// The value is validated, but the pruner's drop rule always uses a
    /// fixed 70% cutoff. See [`crate::cleaner::ColumnPruner`].
    /// Default: 0.7
    pub missing_column_threshold: f64,

    /// Loan status column to collapse into a 0/1 outcome before encoding.
    ///
    /// When `None`, the status column (if present) is treated like any other
    /// text column and gets one-hot encoded.
    /// Default: None
    pub target_column: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            missing_column_threshold: DEFAULT_MISSING_COLUMN_THRESHOLD,
            target_column: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.missing_column_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_column_threshold".to_string(),
                value: self.missing_column_threshold,
            });
        }

        if let Some(target) = &self.target_column
            && target.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyTargetColumn);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Target column name must not be empty")]
    EmptyTargetColumn,
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    missing_column_threshold: Option<f64>,
    target_column: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the threshold handed to the column pruner.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn missing_column_threshold(mut self, threshold: f64) -> Self {
        self.missing_column_threshold = Some(threshold);
        self
    }

    /// Set the loan status column to binarize.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            missing_column_threshold: self
                .missing_column_threshold
                .unwrap_or(DEFAULT_MISSING_COLUMN_THRESHOLD),
            target_column: self.target_column,
        };

        config.validate()?;
        Ok(config)
    }
}
