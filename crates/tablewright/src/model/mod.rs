//! Shared data representation: values, records and datasets.

mod dataset;
mod value;

pub use dataset::{Dataset, Record};
pub use value::{Value, format_number, parse_integer, parse_number};
