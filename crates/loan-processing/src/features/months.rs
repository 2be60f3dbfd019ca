//! Month-difference feature derived from two `"Mon-YYYY"` date columns.

use crate::error::Result;
use crate::utils::require_series;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Name of the derived credit-history length column.
pub const MONTHS_SINCE_EARLIEST_CR: &str = "months_since_earliest_cr";

/// Parse `"Mon-YYYY"` (e.g. `"Dec-2015"`) into `(year, month)`.
///
/// Month abbreviations are matched case-insensitively. Anything else,
/// including full month names or a missing year, yields `None`.
pub fn parse_month_year(text: &str) -> Option<(i32, u32)> {
    let text = text.trim();
    let (month, _) = text.split_once('-')?;
    if month.len() != 3 {
        return None;
    }
    let date = NaiveDate::parse_from_str(&format!("01-{}", text), "%d-%b-%Y").ok()?;
    Some((date.year(), date.month()))
}

/// Signed number of months from `earlier` to `later`, both `"Mon-YYYY"`.
pub fn months_between(later: &str, earlier: &str) -> Option<i64> {
    let (y1, m1) = parse_month_year(later)?;
    let (y2, m2) = parse_month_year(earlier)?;
    Some((y1 as i64 - y2 as i64) * 12 + (m1 as i64 - m2 as i64))
}

/// Compute `(year1 - year2) * 12 + (month1 - month2)` row by row.
///
/// Null or unparseable dates give a null for that row instead of an error.
/// The returned `Int64` series is named [`MONTHS_SINCE_EARLIEST_CR`].
///
/// # Errors
///
/// `MissingColumn` if either date column is absent.
pub fn compute_months(df: &DataFrame, date1: &str, date2: &str) -> Result<Series> {
    let later = require_series(df, date1)?.cast(&DataType::String)?;
    let earlier = require_series(df, date2)?.cast(&DataType::String)?;

    let months: Vec<Option<i64>> = later
        .str()?
        .into_iter()
        .zip(earlier.str()?)
        .map(|(l, e)| months_between(l?, e?))
        .collect();

    Ok(Series::new(MONTHS_SINCE_EARLIEST_CR.into(), months))
}
