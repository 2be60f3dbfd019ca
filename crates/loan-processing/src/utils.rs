//! Shared utilities for the loan preprocessing pipeline.
//!
//! This module contains the dtype checks, column lookups and null-filling
//! helpers used by several stages.

use crate::error::{PreprocessingError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for preprocessing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types (dates, nested, all-null)
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Column Utilities
// =============================================================================

/// Owned copies of the column names, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Fetch a column as a materialized Series, mapping absence to `MissingColumn`.
pub fn require_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| PreprocessingError::MissingColumn(name.to_string()))
}

/// Fail with `MissingColumn` for the first name in `required` absent from `df`.
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    match required
        .iter()
        .find(|name| df.get_column_index(name).is_none())
    {
        Some(missing) => Err(PreprocessingError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Number of float NaN values in a Series. Zero for non-float dtypes.
pub fn nan_count(series: &Series) -> usize {
    match series.dtype() {
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Missing values in a column. Float NaN counts as missing.
pub fn missing_count(column: &Column) -> usize {
    column.null_count() + nan_count(column.as_materialized_series())
}

/// Fraction of missing values in a column. An empty column has no missing values.
pub fn missing_fraction(column: &Column) -> f64 {
    if column.len() == 0 {
        return 0.0;
    }
    missing_count(column) as f64 / column.len() as f64
}

/// Total number of missing values across every column, NaN included.
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(missing_count).sum()
}

/// Replace float NaN with null, keeping the dtype. Other dtypes are returned as is.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::Float32 => {
            let values: Vec<Option<f32>> = series
                .f32()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            Ok(Series::new(series.name().clone(), values))
        }
        DataType::Float64 => {
            let values: Vec<Option<f64>> = series
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            Ok(Series::new(series.name().clone(), values))
        }
        _ => Ok(series.clone()),
    }
}

/// Turn NaN into null in every float column that has any.
///
/// Returns the number of values converted.
pub fn nans_to_nulls(df: &mut DataFrame) -> PolarsResult<usize> {
    let mut converted = 0;
    for col_name in column_names(df) {
        let series = df.column(&col_name)?.as_materialized_series();
        let nans = nan_count(series);
        if nans == 0 {
            continue;
        }
        let cleaned = nan_to_null(series)?;
        df.replace(&col_name, cleaned)?;
        converted += nans;
    }
    Ok(converted)
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Most frequent non-null, non-NaN value of a numeric Series.
///
/// Ties resolve to the smallest value, so the result only depends on the
/// multiset of values and not on row order.
pub fn numeric_mode(series: &Series) -> Option<f64> {
    let as_f64 = series.cast(&DataType::Float64).ok()?;
    let mut values: Vec<f64> = as_f64
        .f64()
        .ok()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    most_frequent_sorted(&values, |a, b| a.total_cmp(b).is_eq()).copied()
}

/// Most frequent non-null value of a Series rendered as text.
///
/// Ties resolve to the lexicographically smallest value.
pub fn string_mode(series: &Series) -> Option<String> {
    let as_str = series.cast(&DataType::String).ok()?;
    let mut values: Vec<&str> = as_str.str().ok()?.into_iter().flatten().collect();
    values.sort_unstable();
    most_frequent_sorted(&values, |a, b| a == b).map(|s| s.to_string())
}

/// Longest run in a sorted slice; the first (smallest) run wins ties.
fn most_frequent_sorted<T>(sorted: &[T], same: impl Fn(&T, &T) -> bool) -> Option<&T> {
    let mut best: Option<(&T, usize)> = None;
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && same(&sorted[start], &sorted[end]) {
            end += 1;
        }
        let run = end - start;
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((&sorted[start], run));
        }
        start = end;
    }
    best.map(|(value, _)| value)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null and NaN values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let as_f64 = series.cast(&DataType::Float64)?;
    let filled: Vec<f64> = as_f64
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with a text value. The result is `String`.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let as_str = series.cast(&DataType::String)?;
    let filled: Vec<String> = as_str
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int32), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Boolean);
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Other);
    }

    #[test]
    fn test_require_columns() {
        let df = df!["a" => [1], "b" => [2]].unwrap();
        assert!(require_columns(&df, &["a", "b"]).is_ok());

        let err = require_columns(&df, &["a", "c", "d"]).unwrap_err();
        assert!(matches!(err, PreprocessingError::MissingColumn(ref c) if c == "c"));
    }

    #[test]
    fn test_missing_fraction() {
        let df = df!["a" => [Some(1.0), None, None, Some(4.0)]].unwrap();
        assert_eq!(missing_fraction(df.column("a").unwrap()), 0.5);

        let empty = df!["a" => Vec::<f64>::new()].unwrap();
        assert_eq!(missing_fraction(empty.column("a").unwrap()), 0.0);
    }

    #[test]
    fn test_missing_fraction_counts_nan() {
        let df = df!["a" => [Some(f64::NAN), None, Some(3.0), Some(4.0)]].unwrap();
        let column = df.column("a").unwrap();
        assert_eq!(missing_count(column), 2);
        assert_eq!(missing_fraction(column), 0.5);
        assert_eq!(total_null_count(&df), 2);
    }

    #[test]
    fn test_nans_to_nulls() {
        let mut df = df![
            "f64" => [Some(f64::NAN), Some(1.0), None],
            "f32" => [Some(2.0f32), Some(f32::NAN), Some(f32::NAN)],
            "i64" => [1i64, 2, 3],
        ]
        .unwrap();

        assert_eq!(nans_to_nulls(&mut df).unwrap(), 3);
        assert_eq!(df.column("f64").unwrap().null_count(), 2);
        assert_eq!(df.column("f32").unwrap().null_count(), 2);
        assert_eq!(df.column("f32").unwrap().dtype(), &DataType::Float32);
        assert_eq!(nan_count(df.column("f64").unwrap().as_materialized_series()), 0);
    }

    #[test]
    fn test_numeric_mode_tie_breaks_to_smallest() {
        let series = Series::new("x".into(), &[Some(3.0), Some(1.0), None, Some(3.0), Some(1.0)]);
        assert_eq!(numeric_mode(&series), Some(1.0));

        let series = Series::new("x".into(), &[5i64, 2, 5]);
        assert_eq!(numeric_mode(&series), Some(5.0));
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));

        let tie = Series::new("test".into(), &[Some("b"), Some("a"), None]);
        assert_eq!(string_mode(&tie), Some("a".to_string()));

        let empty = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode(&empty), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1i32), None, Some(3)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_nulls_replaces_nan() {
        let series = Series::new("test".into(), &[Some(f64::NAN), None, Some(2.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();
        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.0), Some(0.0), Some(2.0)]);
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("test".into(), &[Some("x"), None]);
        let filled = fill_string_nulls(&series, "y").unwrap();
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.str().unwrap().get(1), Some("y"));
    }
}
