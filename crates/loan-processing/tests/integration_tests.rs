//! Integration tests for the loan preprocessing pipeline.
//!
//! These tests drive the full pipeline over a small loan export in
//! `tests/fixtures`.

use loan_processing::{
    ActionType, ColumnPruner, DtypeCategory, Pipeline, PipelineConfig, PreprocessingError,
    PreprocessingStage, ProgressUpdate, get_dtype_category, preprocess,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn load_loans() -> DataFrame {
    load_csv("loans_sample.csv")
}

fn pipeline_with_target() -> Pipeline {
    Pipeline::builder()
        .config(
            PipelineConfig::builder()
                .target_column("loan_status")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.expect("no nulls expected"))
        .collect()
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_pipeline_output_is_numeric_and_complete() {
    let result = pipeline_with_target().process(load_loans()).unwrap();
    let df = &result.data;

    assert_eq!(df.height(), 12);

    let null_count: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
    assert_eq!(null_count, 0, "No missing values should remain");

    for column in df.get_columns() {
        assert_eq!(
            get_dtype_category(column.dtype()),
            DtypeCategory::Numeric,
            "Column '{}' should be numeric",
            column.name()
        );
    }
}

#[test]
fn test_full_pipeline_drops_and_replaces_columns() {
    let result = pipeline_with_target().process(load_loans()).unwrap();
    let df = &result.data;

    assert_eq!(
        result.summary.dropped_columns,
        vec![
            "id",
            "emp_title",
            "earliest_cr_line",
            "mths_since_last_record",
            "total_pymnt",
            "recoveries",
            "hardship_status",
            "settlement_amount",
        ]
    );

    for gone in ["grade", "sub_grade", "emp_length", "addr_state"] {
        assert!(df.column(gone).is_err(), "'{}' should be replaced", gone);
    }
    for dropped in &result.summary.dropped_columns {
        assert!(
            !df.get_column_names_str()
                .iter()
                .any(|name| name == dropped || name.starts_with(&format!("{}_", dropped))),
            "'{}' should not reappear",
            dropped
        );
    }
}

#[test]
fn test_full_pipeline_mapped_values() {
    let result = pipeline_with_target().process(load_loans()).unwrap();
    let df = &result.data;

    assert_eq!(
        f64_values(df, "risk_grade"),
        vec![7.0, 14.0, 15.0, 11.0, 10.0, 4.0, 15.0, 21.0, 27.0, 10.0, 13.0, 10.0]
    );
    assert_eq!(
        f64_values(df, "emp_length_int"),
        vec![10.0, 0.5, 10.0, 10.0, 1.0, 3.0, 8.0, 9.0, 4.0, 0.5, 5.0, 0.0]
    );

    // "PR" has no region; it is imputed with the most common one
    let west = f64_values(df, "state_West");
    assert_eq!(west[10], 1.0);
    assert_eq!(f64_values(df, "state_SouthWest")[0], 1.0);
}

#[test]
fn test_full_pipeline_binarizes_target() {
    let result = pipeline_with_target().process(load_loans()).unwrap();

    assert_eq!(
        f64_values(&result.data, "loan_status"),
        vec![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]
    );
    assert_eq!(result.summary.actions_of(ActionType::TargetBinarized).count(), 1);
}

#[test]
fn test_full_pipeline_months_since_earliest_credit_line() {
    let result = pipeline_with_target().process(load_loans()).unwrap();
    let months = f64_values(&result.data, "months_since_earliest_cr");

    // Dec-2015 minus Jan-1985
    assert_eq!(months[0], 371.0);
    // Dec-2015 minus Apr-1999
    assert_eq!(months[1], 200.0);

    // The malformed and missing dates are filled with the mean of the rest
    let observed = &months[..10];
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    assert!((months[10] - mean).abs() < 1e-9);
    assert!((months[11] - mean).abs() < 1e-9);
}

#[test]
fn test_full_pipeline_without_target_encodes_status() {
    let df = preprocess(load_loans()).unwrap();

    assert!(df.column("loan_status").is_err());
    assert!(df.column("loan_status_Fully Paid").is_ok());
    assert!(df.column("loan_status_Current").is_ok());
}

#[test]
fn test_full_pipeline_is_deterministic() {
    let first = pipeline_with_target().process(load_loans()).unwrap();
    let second = pipeline_with_target().process(load_loans()).unwrap();

    assert_eq!(
        first.data.get_column_names_str(),
        second.data.get_column_names_str()
    );
    assert!(first.data.equals_missing(&second.data));
}

#[test]
fn test_full_pipeline_summary() {
    let result = pipeline_with_target().process(load_loans()).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.rows_before, 12);
    assert_eq!(summary.columns_before, 26);
    assert_eq!(summary.rows_after, 12);
    assert_eq!(summary.columns_after, result.data.width());
    assert!(summary.missing_before > 0);

    for imputed in ["home_ownership", "bc_util", "mths_since_last_delinq", "state"] {
        assert!(
            summary.imputed_columns.iter().any(|c| c == imputed),
            "'{}' should be imputed",
            imputed
        );
    }
    assert!(summary.encoded_columns.iter().any(|c| c == "purpose"));

    let json = serde_json::to_value(summary).unwrap();
    assert_eq!(json["rows_before"], 12);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_required_column() {
    let df = load_loans().drop("emp_length").unwrap();
    let err = Pipeline::builder().build().unwrap().process(df).unwrap_err();

    assert!(err.is_missing_column());
    assert!(matches!(err, PreprocessingError::MissingColumn(ref c) if c == "emp_length"));
    assert_eq!(err.error_code(), "MISSING_COLUMN");
}

#[test]
fn test_missing_configured_target() {
    let df = load_loans().drop("loan_status").unwrap();
    let err = pipeline_with_target().process(df).unwrap_err();
    assert!(matches!(err, PreprocessingError::MissingColumn(ref c) if c == "loan_status"));
}

#[test]
fn test_invalid_threshold() {
    let err = ColumnPruner::with_threshold(1.5).unwrap_err();
    assert!(err.is_invalid_argument());

    let config_err = PipelineConfig::builder()
        .missing_column_threshold(-0.2)
        .build()
        .unwrap_err();
    let err = PreprocessingError::from(config_err);
    assert!(err.is_invalid_argument());
}

#[test]
fn test_threshold_does_not_change_dropped_columns() {
    let strict = Pipeline::builder()
        .config(
            PipelineConfig::builder()
                .missing_column_threshold(0.1)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
        .process(load_loans())
        .unwrap();
    let default = Pipeline::builder().build().unwrap().process(load_loans()).unwrap();

    assert_eq!(strict.summary.dropped_columns, default.summary.dropped_columns);
}

// ============================================================================
// Progress Reporting Tests
// ============================================================================

#[test]
fn test_progress_reporting() {
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let updates_clone = updates.clone();

    Pipeline::builder()
        .config(
            PipelineConfig::builder()
                .target_column("loan_status")
                .build()
                .unwrap(),
        )
        .on_progress(move |update| updates_clone.lock().unwrap().push(update))
        .build()
        .unwrap()
        .process(load_loans())
        .unwrap();

    let updates = updates.lock().unwrap();
    let last = updates.last().expect("progress updates");
    assert_eq!(last.stage, PreprocessingStage::Complete);
    assert_eq!(last.progress, 1.0);

    // Progress never goes backwards
    for pair in updates.windows(2) {
        assert!(pair[1].progress + 1e-6 >= pair[0].progress);
    }

    let per_column = updates
        .iter()
        .filter(|u| u.stage == PreprocessingStage::Imputation && u.items_total.is_some())
        .count();
    assert!(per_column >= 4);
}

#[test]
fn test_progress_reports_failure() {
    let stages: Arc<Mutex<Vec<PreprocessingStage>>> = Arc::new(Mutex::new(Vec::new()));
    let stages_clone = stages.clone();

    let df = load_loans().drop("issue_d").unwrap();
    let result = Pipeline::builder()
        .on_progress(move |update| stages_clone.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .process(df);

    assert!(result.is_err());
    assert_eq!(
        stages.lock().unwrap().last(),
        Some(&PreprocessingStage::Failed)
    );
}
