//! Static reference tables used to recode categorical loan attributes.
//!
//! Three fixed lookups:
//! - US state (plus DC) to geographic [`Region`]
//! - employment-length bucket text to years
//! - credit subgrade (`A1`..`G5`) to a risk rank `1..=35`
//!
//! The tables are built once per process and exposed read-only through
//! [`ReferenceTables::global()`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Geographic region a state is grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    West,
    SouthWest,
    SouthEast,
    MidWest,
    NorthEast,
}

impl Region {
    /// All regions, in declaration order.
    pub const ALL: [Region; 5] = [
        Region::West,
        Region::SouthWest,
        Region::SouthEast,
        Region::MidWest,
        Region::NorthEast,
    ];

    /// Label written into the feature table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::West => "West",
            Self::SouthWest => "SouthWest",
            Self::SouthEast => "SouthEast",
            Self::MidWest => "MidWest",
            Self::NorthEast => "NorthEast",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STATE_REGIONS: [(&str, Region); 51] = [
    ("CA", Region::West),
    ("OR", Region::West),
    ("UT", Region::West),
    ("WA", Region::West),
    ("CO", Region::West),
    ("NV", Region::West),
    ("AK", Region::West),
    ("MT", Region::West),
    ("HI", Region::West),
    ("WY", Region::West),
    ("ID", Region::West),
    ("AZ", Region::SouthWest),
    ("TX", Region::SouthWest),
    ("NM", Region::SouthWest),
    ("OK", Region::SouthWest),
    ("GA", Region::SouthEast),
    ("NC", Region::SouthEast),
    ("VA", Region::SouthEast),
    ("FL", Region::SouthEast),
    ("KY", Region::SouthEast),
    ("SC", Region::SouthEast),
    ("LA", Region::SouthEast),
    ("AL", Region::SouthEast),
    ("WV", Region::SouthEast),
    ("DC", Region::SouthEast),
    ("AR", Region::SouthEast),
    ("DE", Region::SouthEast),
    ("MS", Region::SouthEast),
    ("TN", Region::SouthEast),
    ("IL", Region::MidWest),
    ("MO", Region::MidWest),
    ("MN", Region::MidWest),
    ("OH", Region::MidWest),
    ("WI", Region::MidWest),
    ("KS", Region::MidWest),
    ("MI", Region::MidWest),
    ("SD", Region::MidWest),
    ("IA", Region::MidWest),
    ("NE", Region::MidWest),
    ("IN", Region::MidWest),
    ("ND", Region::MidWest),
    ("CT", Region::NorthEast),
    ("NY", Region::NorthEast),
    ("PA", Region::NorthEast),
    ("NJ", Region::NorthEast),
    ("RI", Region::NorthEast),
    ("MA", Region::NorthEast),
    ("MD", Region::NorthEast),
    ("VT", Region::NorthEast),
    ("NH", Region::NorthEast),
    ("ME", Region::NorthEast),
];

const EMP_LENGTH_YEARS: [(&str, f64); 12] = [
    ("10+ years", 10.0),
    ("9 years", 9.0),
    ("8 years", 8.0),
    ("7 years", 7.0),
    ("6 years", 6.0),
    ("5 years", 5.0),
    ("4 years", 4.0),
    ("3 years", 3.0),
    ("2 years", 2.0),
    ("1 year", 1.0),
    ("< 1 year", 0.5),
    ("n/a", 0.0),
];

const GRADE_LETTERS: &str = "ABCDEFG";
const SUBGRADE_NUMBERS: &str = "12345";

static REFERENCE_TABLES: Lazy<ReferenceTables> = Lazy::new(ReferenceTables::build);

/// The three lookups applied by the categorical mapper.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub state_to_region: HashMap<String, Region>,
    pub emp_length_to_years: HashMap<String, f64>,
    pub sub_grade_to_risk: HashMap<String, i32>,
}

impl ReferenceTables {
    /// Process-wide tables, built on first access.
    pub fn global() -> &'static ReferenceTables {
        &REFERENCE_TABLES
    }

    fn build() -> Self {
        let state_to_region = STATE_REGIONS
            .iter()
            .map(|(code, region)| (code.to_string(), *region))
            .collect();

        let emp_length_to_years = EMP_LENGTH_YEARS
            .iter()
            .map(|(bucket, years)| (bucket.to_string(), *years))
            .collect();

        // A1 = 1, A2 = 2, ..., G5 = 35
        let sub_grade_to_risk = GRADE_LETTERS
            .chars()
            .flat_map(|letter| SUBGRADE_NUMBERS.chars().map(move |n| format!("{letter}{n}")))
            .zip(1..)
            .collect();

        Self {
            state_to_region,
            emp_length_to_years,
            sub_grade_to_risk,
        }
    }

    /// Region for a two-letter state code, `None` if unmapped.
    pub fn region(&self, state: &str) -> Option<Region> {
        self.state_to_region.get(state).copied()
    }

    /// Years of employment for a bucket label, `None` if unmapped.
    pub fn emp_length(&self, bucket: &str) -> Option<f64> {
        self.emp_length_to_years.get(bucket).copied()
    }

    /// Risk rank for a subgrade, `None` if unmapped.
    pub fn risk_rank(&self, sub_grade: &str) -> Option<i32> {
        self.sub_grade_to_risk.get(sub_grade).copied()
    }
}

/// Risk rank of a subgrade from the global table.
pub fn sub_grade_to_risk(sub_grade: &str) -> Option<i32> {
    ReferenceTables::global().risk_rank(sub_grade)
}

/// Region of a state code from the global table.
pub fn state_to_region(state: &str) -> Option<Region> {
    ReferenceTables::global().region(state)
}

/// Employment years of a bucket label from the global table.
pub fn emp_length_to_years(bucket: &str) -> Option<f64> {
    ReferenceTables::global().emp_length(bucket)
}
