//! Progress reporting for the preprocessing pipeline.
//!
//! The pipeline is synchronous; a reporter is simply called at the start and
//! end of every stage, and once per column while imputing.
//!
//! # Example
//!
//! ```rust,ignore
//! use loan_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the preprocessing pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessingStage {
    /// Checking that every required column exists
    Validating,
    /// Computing months since the earliest credit line
    DerivingFeatures,
    /// Collapsing the loan status into 0/1
    BinarizingTarget,
    /// Recoding state, subgrade and employment length
    MappingCategoricals,
    /// Dropping missing, leakage and identifier columns
    Pruning,
    /// Imputing missing values
    Imputation,
    /// One-hot encoding text columns
    Encoding,
    /// Replacing any residual missing value with zero
    FinalFill,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PreprocessingStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Validating => "Validating Schema",
            Self::DerivingFeatures => "Deriving Features",
            Self::BinarizingTarget => "Binarizing Target",
            Self::MappingCategoricals => "Mapping Categoricals",
            Self::Pruning => "Pruning Columns",
            Self::Imputation => "Imputing Values",
            Self::Encoding => "Encoding Categoricals",
            Self::FinalFill => "Filling Residual Nulls",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run attributed to this stage.
    ///
    /// The working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Validating => 0.02,
            Self::DerivingFeatures => 0.08,
            Self::BinarizingTarget => 0.05,
            Self::MappingCategoricals => 0.15,
            Self::Pruning => 0.15,
            Self::Imputation => 0.35,
            Self::Encoding => 0.15,
            Self::FinalFill => 0.05,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Validating => 0.0,
            Self::DerivingFeatures => 0.02,
            Self::BinarizingTarget => 0.10,
            Self::MappingCategoricals => 0.15,
            Self::Pruning => 0.30,
            Self::Imputation => 0.45,
            Self::Encoding => 0.80,
            Self::FinalFill => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update sent to a [`ProgressReporter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PreprocessingStage,

    /// Optional sub-stage description (e.g., "Column: bc_util")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: PreprocessingStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a new progress update with item counts.
    pub fn with_items(
        stage: PreprocessingStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        Self {
            sub_stage: Some(sub_stage.into()),
            items_processed: Some(current),
            items_total: Some(total),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(PreprocessingStage::Complete, 1.0, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(PreprocessingStage::Failed, 0.0, message)
    }
}

/// Receives progress updates during preprocessing.
///
/// `Send + Sync` so a pipeline holding a reporter can be moved to a worker
/// thread by the caller.
pub trait ProgressReporter: Send + Sync {
    /// Called at stage boundaries and once per imputed column.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
