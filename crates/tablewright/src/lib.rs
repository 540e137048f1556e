//! Tablewright: in-memory tabular transformation engine.
//!
//! A [`Session`] holds three datasets: the canonical snapshot captured at
//! load time, the working dataset that row-level operations rewrite, and an
//! analysis dataset produced by grouping and reshaping.
//!
//! # Core Principles
//!
//! - **Non-destructive**: The loaded data is never modified and can always be restored
//! - **Row faults stay in rows**: A formula that fails on one row writes `#ERROR` there and keeps going
//! - **Replayable**: Any sequence of operations can be stored as a JSON [`Pipeline`]
//!
//! # Example
//!
//! ```no_run
//! use tablewright::{AggregateFunction, FilterOperator, Session};
//!
//! let mut session = Session::new();
//! session.load_file("sales.csv").unwrap();
//! session.filter("region", &FilterOperator::Equals, "north").unwrap();
//! session.aggregate("product", "amount", AggregateFunction::Sum).unwrap();
//!
//! for row in session.active() {
//!     println!("{:?}", row);
//! }
//! ```

pub mod analysis;
pub mod error;
pub mod export;
pub mod formula;
pub mod input;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod session;

pub use analysis::AggregateFunction;
pub use error::{Result, TablewrightError};
pub use export::{ExportFormat, Exporter};
pub use formula::{
    ERROR_MARKER, Formula, LogicFormula, LogicOperator, NumericFormula, NumericFunction,
    TextFormula, TextFunction,
};
pub use input::{Parser, ParserConfig, SourceFormat, SourceMetadata};
pub use model::{Dataset, Record, Value};
pub use ops::FilterOperator;
pub use pipeline::{Pipeline, Step};
pub use session::{OperationOutcome, Session, SessionConfig, View};
