//! Encoding of non-numeric columns into numeric indicators.

mod one_hot;

pub use one_hot::{EncodingOutcome, OneHotEncoder};
