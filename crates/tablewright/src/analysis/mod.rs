//! Secondary analysis tables derived from the working dataset.

mod aggregate;
mod reshape;

pub use aggregate::{AggregateFunction, BLANK_GROUP, aggregate};
pub use reshape::{DEFAULT_TRANSPOSE_LIMIT, FIELD_COLUMN, UNIQUE_COLUMN, transpose, unique};
