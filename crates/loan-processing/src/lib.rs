//! Loan Feature Preprocessing Library
//!
//! Turns a raw loan-application table into a fully numeric, null-free feature
//! table for a binary default-prediction model, using Polars.
//!
//! # Overview
//!
//! - **Derived Features**: months between the issue date and the earliest credit line
//! - **Categorical Mapping**: state to region, subgrade to risk rank, employment length to years
//! - **Target Binarization**: optional 0/1 outcome from the loan status text
//! - **Column Pruning**: mostly-missing, leakage and identifier columns
//! - **Imputation**: per-column median, mean or mode
//! - **Encoding**: one-hot indicators for every remaining text column
//! - **Progress Reporting**: stage-by-stage updates through a callback
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loan_processing::{Pipeline, PipelineConfig};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("loans.csv".into()))?
//!     .finish()?;
//!
//! let config = PipelineConfig::builder()
//!     .target_column("loan_status")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//!
//! println!("Dropped: {:?}", result.summary.dropped_columns);
//! ```
//!
//! For the default configuration without a summary, use [`preprocess`].

pub mod cleaner;
pub mod config;
pub mod encoders;
pub mod error;
pub mod features;
pub mod imputers;
pub mod pipeline;
pub mod reference;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::ColumnPruner;
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use encoders::{EncodingOutcome, OneHotEncoder};
pub use error::{PreprocessingError, Result as PreprocessingResult, ResultExt};
pub use features::{CategoricalMapper, TargetBinarizer, compute_months};
pub use imputers::{ColumnImputer, ImputationStrategy, ImputedColumn, StatisticalImputer};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PreprocessingStage, ProgressReporter,
    ProgressUpdate, SchemaValidator, preprocess,
};
pub use reference::{
    ReferenceTables, Region, emp_length_to_years, state_to_region, sub_grade_to_risk,
};
pub use types::{ActionType, PipelineResult, PreprocessingAction, PreprocessingSummary};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
