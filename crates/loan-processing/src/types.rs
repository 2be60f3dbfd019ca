//! Result and run-summary types returned by the pipeline.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Output of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The fully numeric, null-free feature table.
    pub data: DataFrame,
    /// Auditable record of what each stage did.
    pub summary: PreprocessingSummary,
}

/// Kind of change a stage made to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A new column was computed from existing ones.
    FeatureDerived,
    /// A raw categorical column was recoded through a reference table.
    CategoricalMapped,
    /// The status column was collapsed to 0/1.
    TargetBinarized,
    /// A column was removed.
    ColumnRemoved,
    /// Missing values in a column were filled.
    ValueImputed,
    /// A column was expanded into indicator columns.
    ColumnEncoded,
    /// Residual missing values were replaced with zero.
    ZeroFilled,
}

/// A single change made by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingAction {
    pub action_type: ActionType,
    /// Column the action applied to, or `"dataset"`.
    pub target: String,
    pub description: String,
}

impl PreprocessingAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Human-readable summary of what the pipeline did.
///
/// Serializable so a caller can persist it next to the processed table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,

    pub columns_before: usize,
    pub columns_after: usize,

    /// Missing cells in the input table.
    pub missing_before: usize,
    /// Missing cells replaced by the final zero fill.
    pub zero_filled: usize,

    /// Columns removed by the pruner, in table order.
    pub dropped_columns: Vec<String>,
    /// Columns whose missing values were imputed.
    pub imputed_columns: Vec<String>,
    /// Columns expanded by the one-hot encoder.
    pub encoded_columns: Vec<String>,

    /// Every action in the order it happened.
    pub actions: Vec<PreprocessingAction>,
}

impl PreprocessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: PreprocessingAction) {
        self.actions.push(action);
    }

    /// Actions of one kind, in order.
    pub fn actions_of(&self, action_type: ActionType) -> impl Iterator<Item = &PreprocessingAction> {
        self.actions
            .iter()
            .filter(move |a| a.action_type == action_type)
    }
}
