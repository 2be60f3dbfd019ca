//! Main preprocessing pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! turning a raw loan table into a numeric, null-free feature table.

use crate::cleaner::ColumnPruner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::encoders::OneHotEncoder;
use crate::error::{Result, ResultExt};
use crate::features::{
    CategoricalMapper, EARLIEST_CREDIT_LINE, EMP_LENGTH_INT_COLUMN, ISSUE_DATE,
    MONTHS_SINCE_EARLIEST_CR, RAW_CATEGORICAL_COLUMNS, REGION_COLUMN, RISK_GRADE_COLUMN,
    TargetBinarizer, compute_months,
};
use crate::imputers::ColumnImputer;
use crate::pipeline::progress::{
    ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::schema::SchemaValidator;
use crate::types::{ActionType, PipelineResult, PreprocessingAction, PreprocessingSummary};
use crate::utils::{
    column_names, fill_numeric_nulls, is_numeric_dtype, missing_count, total_null_count,
};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The loan preprocessing pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// Stages run in a fixed order:
/// 1. schema check
/// 2. `months_since_earliest_cr` from `issue_d` and `earliest_cr_line`
/// 3. target binarization, only when a target column is configured
/// 4. categorical mapping
/// 5. column pruning
/// 6. imputation
/// 7. one-hot encoding
/// 8. zero fill of anything still missing
///
/// # Example
///
/// ```rust,ignore
/// use loan_processing::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().target_column("loan_status").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(dataframe)?;
///
/// println!("{} features", result.data.width());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    pruner: ColumnPruner,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a raw loan table through every stage.
    ///
    /// Takes ownership of the table. The first failing stage aborts the run;
    /// a `Failed` progress update is reported and no table is returned.
    ///
    /// # Errors
    ///
    /// `MissingColumn` if a required source column is absent. Polars errors
    /// from a stage are wrapped with that stage's name.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage_started(&self, stage: PreprocessingStage, message: &str) {
        info!("{}", message);
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn stage_finished(&self, stage: PreprocessingStage, message: impl Into<String>) {
        self.report_progress(ProgressUpdate::new(stage, 1.0, message));
    }

    fn process_internal(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();

        let mut summary = PreprocessingSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();
        summary.missing_before = total_null_count(&df);

        info!(
            "Starting preprocessing pipeline: {} rows x {} columns",
            summary.rows_before, summary.columns_before
        );

        // Step 1: Schema check
        self.stage_started(PreprocessingStage::Validating, "Validating input schema...");
        SchemaValidator::validate(&df, &self.config)?;
        self.stage_finished(PreprocessingStage::Validating, "Schema validated");

        // Step 2: Credit history length
        let df = self.derive_features(df, &mut summary)?;

        // Step 3: Target
        let df = match self.config.target_column.as_deref() {
            Some(target) => self.binarize_target(df, target, &mut summary)?,
            None => {
                debug!("No target column configured; skipping binarization");
                df
            }
        };

        // Step 4: Reference-table recoding
        let df = self.map_categoricals(df, &mut summary)?;

        // Step 5: Pruning
        let df = self.prune_columns(df, &mut summary)?;

        // Step 6: Imputation
        let df = self.impute(df, &mut summary)?;

        // Step 7: One-hot encoding
        let df = self.encode(df, &mut summary)?;

        // Step 8: Residual nulls
        let df = self.fill_remaining_nulls(df, &mut summary)?;

        summary.rows_after = df.height();
        summary.columns_after = df.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Pipeline finished in {}ms: {} rows x {} columns",
            summary.duration_ms, summary.rows_after, summary.columns_after
        );

        Ok(PipelineResult { data: df, summary })
    }

    fn derive_features(
        &self,
        mut df: DataFrame,
        summary: &mut PreprocessingSummary,
    ) -> Result<DataFrame> {
        self.stage_started(
            PreprocessingStage::DerivingFeatures,
            "Computing months since earliest credit line...",
        );

        let months = compute_months(&df, ISSUE_DATE, EARLIEST_CREDIT_LINE)
            .context("Deriving credit history length")?;
        let unparsed = months.null_count();
        df.with_column(months)
            .context("Deriving credit history length")?;

        if unparsed > 0 {
            warn!(
                "{} rows have an unparseable or missing date; '{}' left null",
                unparsed, MONTHS_SINCE_EARLIEST_CR
            );
        }
        summary.add_action(PreprocessingAction::new(
            ActionType::FeatureDerived,
            MONTHS_SINCE_EARLIEST_CR,
            format!("Months between '{}' and '{}'", ISSUE_DATE, EARLIEST_CREDIT_LINE),
        ));

        self.stage_finished(PreprocessingStage::DerivingFeatures, "Derived features computed");
        Ok(df)
    }

    fn binarize_target(
        &self,
        df: DataFrame,
        target: &str,
        summary: &mut PreprocessingSummary,
    ) -> Result<DataFrame> {
        self.stage_started(PreprocessingStage::BinarizingTarget, "Binarizing loan status...");

        let df = TargetBinarizer::binarize(df, target).context("Binarizing target")?;
        let positives = df
            .column(target)
            .ok()
            .and_then(|col| col.as_materialized_series().sum::<i64>().ok())
            .unwrap_or(0);
        debug!("'{}' has {} good outcomes of {}", target, positives, df.height());

        summary.add_action(PreprocessingAction::new(
            ActionType::TargetBinarized,
            target,
            format!("{} of {} rows marked good", positives, df.height()),
        ));

        self.stage_finished(PreprocessingStage::BinarizingTarget, "Target binarized");
        Ok(df)
    }

    fn map_categoricals(
        &self,
        df: DataFrame,
        summary: &mut PreprocessingSummary,
    ) -> Result<DataFrame> {
        self.stage_started(
            PreprocessingStage::MappingCategoricals,
            "Mapping categorical variables...",
        );

        let df = CategoricalMapper::default()
            .map_categorical_variables(df)
            .context("Mapping categorical variables")?;

        for (derived, source) in [
            (REGION_COLUMN, "addr_state"),
            (RISK_GRADE_COLUMN, "sub_grade"),
            (EMP_LENGTH_INT_COLUMN, "emp_length"),
        ] {
            summary.add_action(PreprocessingAction::new(
                ActionType::CategoricalMapped,
                derived,
                format!("Mapped from '{}'", source),
            ));
        }
        for raw in RAW_CATEGORICAL_COLUMNS {
            summary.add_action(PreprocessingAction::new(
                ActionType::ColumnRemoved,
                raw,
                "Raw categorical replaced by mapped column",
            ));
        }

        self.stage_finished(PreprocessingStage::MappingCategoricals, "Categoricals mapped");
        Ok(df)
    }

    fn prune_columns(
        &self,
        df: DataFrame,
        summary: &mut PreprocessingSummary,
    ) -> Result<DataFrame> {
        self.stage_started(PreprocessingStage::Pruning, "Pruning columns...");

        let (df, dropped) = self.pruner.prune(df).context("Pruning columns")?;
        for name in &dropped {
            summary.add_action(PreprocessingAction::new(
                ActionType::ColumnRemoved,
                name.as_str(),
                "Mostly missing, leakage or identifier column",
            ));
        }

        self.stage_finished(
            PreprocessingStage::Pruning,
            format!("Dropped {} columns", dropped.len()),
        );
        summary.dropped_columns = dropped;
        Ok(df)
    }

    fn impute(&self, mut df: DataFrame, summary: &mut PreprocessingSummary) -> Result<DataFrame> {
        self.stage_started(PreprocessingStage::Imputation, "Imputing missing values...");

        let mut steps: Vec<String> = Vec::new();
        let imputed = ColumnImputer::impute_with_progress(&mut df, &mut steps, |index, total, name| {
            self.report_progress(ProgressUpdate::with_items(
                PreprocessingStage::Imputation,
                format!("Column: {}", name),
                index,
                total,
                format!("Imputing '{}'", name),
            ));
        })
        .context("Imputing missing values")?;

        for filled in &imputed {
            summary.add_action(PreprocessingAction::new(
                ActionType::ValueImputed,
                filled.column.as_str(),
                filled.description.as_str(),
            ));
        }

        self.stage_finished(
            PreprocessingStage::Imputation,
            format!("Imputed {} columns", imputed.len()),
        );
        summary.imputed_columns = imputed.into_iter().map(|c| c.column).collect();
        Ok(df)
    }

    fn encode(&self, df: DataFrame, summary: &mut PreprocessingSummary) -> Result<DataFrame> {
        self.stage_started(PreprocessingStage::Encoding, "One-hot encoding text columns...");

        let (df, outcome) = OneHotEncoder::encode(df).context("One-hot encoding")?;
        for name in &outcome.encoded_columns {
            let prefix = format!("{}_", name);
            let created = outcome
                .indicator_columns
                .iter()
                .filter(|c| c.starts_with(&prefix))
                .count();
            summary.add_action(PreprocessingAction::new(
                ActionType::ColumnEncoded,
                name.as_str(),
                format!("Expanded into {} indicator columns", created),
            ));
        }

        self.stage_finished(
            PreprocessingStage::Encoding,
            format!(
                "Encoded {} columns into {} indicators",
                outcome.encoded_columns.len(),
                outcome.indicator_columns.len()
            ),
        );
        summary.encoded_columns = outcome.encoded_columns;
        Ok(df)
    }

    /// Replace every remaining null with 0.
    fn fill_remaining_nulls(
        &self,
        mut df: DataFrame,
        summary: &mut PreprocessingSummary,
    ) -> Result<DataFrame> {
        self.stage_started(PreprocessingStage::FinalFill, "Filling residual missing values...");

        let remaining = total_null_count(&df);
        if remaining == 0 {
            debug!("No residual missing values");
        } else {
            for col_name in column_names(&df) {
                let column = df.column(&col_name)?;
                if missing_count(column) == 0 {
                    continue;
                }
                let series = column.as_materialized_series();
                if !is_numeric_dtype(series.dtype()) {
                    warn!("Column '{}' is not numeric; leaving residual nulls", col_name);
                    continue;
                }
                let filled = fill_numeric_nulls(series, 0.0).context("Filling residual nulls")?;
                df.replace(&col_name, filled).context("Filling residual nulls")?;
                debug!("Zero-filled residual nulls in '{}'", col_name);
            }
            info!("Replaced {} residual missing values with 0", remaining);
            summary.add_action(PreprocessingAction::new(
                ActionType::ZeroFilled,
                "dataset",
                format!("Replaced {} residual missing values with 0", remaining),
            ));
        }
        summary.zero_filled = remaining;

        self.stage_finished(PreprocessingStage::FinalFill, "Residual missing values filled");
        Ok(df)
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use loan_processing::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct StageLogger;
    ///
    /// impl ProgressReporter for StageLogger {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(StageLogger))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let pruner = ColumnPruner::with_threshold(config.missing_column_threshold).map_err(|_| {
            ConfigValidationError::InvalidThreshold {
                field: "missing_column_threshold".to_string(),
                value: config.missing_column_threshold,
            }
        })?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            pruner,
        })
    }
}

/// Run the pipeline with default configuration and return only the table.
///
/// # Errors
///
/// See [`Pipeline::process`].
pub fn preprocess(df: DataFrame) -> Result<DataFrame> {
    let pipeline = Pipeline::builder().build()?;
    Ok(pipeline.process(df)?.data)
}
