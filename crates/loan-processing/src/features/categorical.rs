//! Recodes the raw state, subgrade and employment-length columns.

use crate::error::Result;
use crate::reference::ReferenceTables;
use crate::utils::{require_columns, require_series};
use polars::prelude::*;
use tracing::debug;

pub const ADDR_STATE: &str = "addr_state";
pub const SUB_GRADE: &str = "sub_grade";
pub const GRADE: &str = "grade";
pub const EMP_LENGTH: &str = "emp_length";

/// Region label derived from `addr_state`.
pub const REGION_COLUMN: &str = "state";
/// Risk rank derived from `sub_grade`.
pub const RISK_GRADE_COLUMN: &str = "risk_grade";
/// Years of employment derived from `emp_length`.
pub const EMP_LENGTH_INT_COLUMN: &str = "emp_length_int";

/// Raw columns removed once their numeric derivatives exist.
pub const RAW_CATEGORICAL_COLUMNS: [&str; 4] = [GRADE, SUB_GRADE, EMP_LENGTH, ADDR_STATE];

/// Applies the reference tables to the raw categorical columns.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalMapper<'a> {
    tables: &'a ReferenceTables,
}

impl Default for CategoricalMapper<'static> {
    fn default() -> Self {
        Self::new(ReferenceTables::global())
    }
}

impl<'a> CategoricalMapper<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// Add `state`, `risk_grade` and `emp_length_int`, then drop the four raw
    /// columns. Unmapped values become nulls.
    ///
    /// # Errors
    ///
    /// `MissingColumn` if any of `grade`, `sub_grade`, `emp_length`,
    /// `addr_state` is absent. The table is left untouched in that case.
    pub fn map_categorical_variables(&self, mut df: DataFrame) -> Result<DataFrame> {
        require_columns(&df, &RAW_CATEGORICAL_COLUMNS)?;

        let regions = self.lookup(&df, ADDR_STATE, |s| {
            self.tables.region(s).map(|r| r.as_str().to_string())
        })?;
        let risk = self.lookup(&df, SUB_GRADE, |s| self.tables.risk_rank(s))?;
        let emp_years = self.lookup(&df, EMP_LENGTH, |s| self.tables.emp_length(s))?;

        for (name, values) in [
            (REGION_COLUMN, regions),
            (RISK_GRADE_COLUMN, risk),
            (EMP_LENGTH_INT_COLUMN, emp_years),
        ] {
            debug!("Derived '{}' ({} unmapped)", name, values.null_count());
            df.with_column(values.with_name(name.into()))?;
        }

        Ok(df.drop_many(RAW_CATEGORICAL_COLUMNS))
    }

    fn lookup<T>(
        &self,
        df: &DataFrame,
        column: &str,
        map: impl Fn(&str) -> Option<T>,
    ) -> Result<Series>
    where
        Series: NamedFrom<Vec<Option<T>>, [Option<T>]>,
    {
        let source = require_series(df, column)?.cast(&DataType::String)?;
        let mapped: Vec<Option<T>> = source
            .str()?
            .into_iter()
            .map(|value| value.and_then(&map))
            .collect();
        Ok(Series::new(column.into(), mapped))
    }
}
