//! Feature derivation stages.
//!
//! - month difference between two `"Mon-YYYY"` date columns
//! - categorical recoding through the static reference tables
//! - binary target from the loan status text

mod categorical;
mod months;
mod target;

pub use categorical::{
    ADDR_STATE, CategoricalMapper, EMP_LENGTH, EMP_LENGTH_INT_COLUMN, GRADE,
    RAW_CATEGORICAL_COLUMNS, REGION_COLUMN, RISK_GRADE_COLUMN, SUB_GRADE,
};
pub use months::{MONTHS_SINCE_EARLIEST_CR, compute_months, months_between, parse_month_year};
pub use target::{GOOD_STATUSES, TargetBinarizer};

/// Later date column of the credit-history feature.
pub const ISSUE_DATE: &str = "issue_d";
/// Earlier date column of the credit-history feature.
pub const EARLIEST_CREDIT_LINE: &str = "earliest_cr_line";
