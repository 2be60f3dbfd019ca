//! One-hot encoding.
//!
//! Every column that is neither numeric nor boolean is expanded into one
//! `UInt8` indicator per distinct non-null value, named `{column}_{value}`.
//! Indicators are appended after the pass-through columns, grouped by source
//! column and ordered by value. Boolean columns become `UInt8` 0/1.

use crate::error::Result;
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// What the encoder did to the table.
#[derive(Debug, Clone, Default)]
pub struct EncodingOutcome {
    /// Source columns replaced by indicators.
    pub encoded_columns: Vec<String>,
    /// Indicator columns created, in output order.
    pub indicator_columns: Vec<String>,
}

/// Expands text columns into indicator columns.
pub struct OneHotEncoder;

impl OneHotEncoder {
    /// Encode every non-numeric column.
    ///
    /// # Errors
    ///
    /// A polars duplicate-column error if an indicator name collides with an
    /// existing column.
    pub fn encode(df: DataFrame) -> Result<(DataFrame, EncodingOutcome)> {
        let mut passthrough: Vec<Column> = Vec::with_capacity(df.width());
        let mut indicators: Vec<Column> = Vec::new();
        let mut outcome = EncodingOutcome::default();

        for column in df.get_columns() {
            match get_dtype_category(column.dtype()) {
                DtypeCategory::Numeric => passthrough.push(column.clone()),
                DtypeCategory::Boolean => passthrough.push(column.cast(&DataType::UInt8)?),
                DtypeCategory::String | DtypeCategory::Other => {
                    let expanded = Self::indicators_for(column.as_materialized_series())?;
                    debug!(
                        "One-hot encoded '{}' into {} columns",
                        column.name(),
                        expanded.len()
                    );
                    outcome.encoded_columns.push(column.name().to_string());
                    outcome
                        .indicator_columns
                        .extend(expanded.iter().map(|s| s.name().to_string()));
                    indicators.extend(expanded.into_iter().map(Column::from));
                }
            }
        }

        passthrough.extend(indicators);
        let encoded = DataFrame::new(passthrough)?;
        Ok((encoded, outcome))
    }

    /// One indicator series per distinct non-null value of `series`.
    pub fn indicators_for(series: &Series) -> Result<Vec<Series>> {
        let text = series.cast(&DataType::String)?;
        let values = text.str()?;
        let categories: BTreeSet<&str> = values.into_iter().flatten().collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let flags: Vec<u8> = values
                    .into_iter()
                    .map(|value| u8::from(value == Some(category)))
                    .collect();
                Series::new(format!("{}_{}", series.name(), category).into(), flags)
            })
            .collect())
    }
}
