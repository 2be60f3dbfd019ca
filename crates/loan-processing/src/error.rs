//! Custom error types for the loan preprocessing pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Stages fail
//! fast: the first error aborts the run and is returned to the caller as-is.
//!
//! Errors are serializable so that a caller can forward them (for example as
//! part of a JSON run summary) without losing the stable error code.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessingError {
    /// A parameter is outside its contractual range (e.g. a threshold not in `[0, 1]`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A column required by a stage is absent from the table.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Returns the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &PreprocessingError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error reports an absent column.
    pub fn is_missing_column(&self) -> bool {
        matches!(self.root(), Self::MissingColumn(_))
    }

    /// Check if this error reports an out-of-range parameter.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root(), Self::InvalidArgument(_))
    }
}

impl From<ConfigValidationError> for PreprocessingError {
    fn from(err: ConfigValidationError) -> Self {
        PreprocessingError::InvalidArgument(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PreprocessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PreprocessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PreprocessingError::InvalidArgument("threshold".to_string()).error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            PreprocessingError::MissingColumn("sub_grade".to_string()).error_code(),
            "MISSING_COLUMN"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = PreprocessingError::MissingColumn("addr_state".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MISSING_COLUMN"));
        assert!(json.contains("addr_state"));
    }

    #[test]
    fn test_with_context() {
        let error = PreprocessingError::MissingColumn("grade".to_string())
            .with_context("Mapping categorical variables");
        assert!(error.to_string().contains("Mapping categorical variables"));
        assert_eq!(error.error_code(), "MISSING_COLUMN"); // Root code survives wrapping
        assert!(error.is_missing_column());
        assert!(!error.is_invalid_argument());
    }

    #[test]
    fn test_config_error_becomes_invalid_argument() {
        let config_err = ConfigValidationError::InvalidThreshold {
            field: "missing_column_threshold".to_string(),
            value: 1.5,
        };
        let error: PreprocessingError = config_err.into();
        assert!(error.is_invalid_argument());
        assert!(error.to_string().contains("1.5"));
    }
}
