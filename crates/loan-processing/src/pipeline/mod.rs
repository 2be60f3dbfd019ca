//! Pipeline module.
//!
//! This module provides the preprocessing pipeline, its schema check and
//! progress reporting.

mod builder;
pub mod progress;
mod schema;

pub use builder::{Pipeline, PipelineBuilder, preprocess};
pub use progress::{
    ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate,
};
pub use schema::SchemaValidator;
