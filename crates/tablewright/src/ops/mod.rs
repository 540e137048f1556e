//! Row-level operations on the working dataset.
//!
//! Each operation reads a dataset and returns a new one that replaces it.

mod dedupe;
mod filter;
mod hierarchy;
mod sort;

pub use dedupe::dedupe;
pub use filter::{FilterOperator, filter};
pub use hierarchy::{ID_COLUMN, UNIQUE_KEY_COLUMN, assign_hierarchy};
pub use sort::sort;
