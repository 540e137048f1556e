//! Formula interpreter producing derived columns.
//!
//! A [`Formula`] is evaluated once per row in one of three modes:
//!
//! - **text**: string functions (TRIM, UPPER, LOWER, LEN, LEFT, RIGHT, CONCAT)
//! - **numeric**: rounding and arithmetic with unparsable inputs read as 0
//! - **logic**: a single IF/THEN/ELSE comparison
//!
//! A fault in one row writes [`ERROR_MARKER`] into that row's new cell and
//! never stops the rest of the dataset from being computed.

mod logic;
mod numeric;
mod text;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, TablewrightError};
use crate::model::{Dataset, Record, Value};

pub use logic::{LogicFormula, LogicOperator};
pub use numeric::{NumericFormula, NumericFunction};
pub use text::{TextFormula, TextFunction};

/// Cell value written when a row fails to evaluate.
pub const ERROR_MARKER: &str = "#ERROR";

/// Why a single row could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaFault {
    #[error("CONCAT needs at least one column")]
    NoColumns,
}

/// A formula in one of the three evaluation modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Formula {
    Text(TextFormula),
    #[serde(alias = "math")]
    Numeric(NumericFormula),
    Logic(LogicFormula),
}

impl Formula {
    /// Evaluate against one row.
    pub fn evaluate(&self, row: &Record) -> std::result::Result<Value, FormulaFault> {
        match self {
            Formula::Text(f) => f.evaluate(row),
            Formula::Numeric(f) => Ok(f.evaluate(row)),
            Formula::Logic(f) => Ok(f.evaluate(row)),
        }
    }

    /// Name of the evaluation mode.
    pub fn mode(&self) -> &'static str {
        match self {
            Formula::Text(_) => "text",
            Formula::Numeric(_) => "numeric",
            Formula::Logic(_) => "logic",
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Text(formula) => fmt::Display::fmt(formula, f),
            Formula::Numeric(formula) => fmt::Display::fmt(formula, f),
            Formula::Logic(formula) => fmt::Display::fmt(formula, f),
        }
    }
}

impl From<TextFormula> for Formula {
    fn from(f: TextFormula) -> Self {
        Formula::Text(f)
    }
}

impl From<NumericFormula> for Formula {
    fn from(f: NumericFormula) -> Self {
        Formula::Numeric(f)
    }
}

impl From<LogicFormula> for Formula {
    fn from(f: LogicFormula) -> Self {
        Formula::Logic(f)
    }
}

/// Output of [`apply_formula`].
#[derive(Debug, Clone)]
pub struct FormulaOutput {
    /// Dataset with the new column on every row.
    pub data: Dataset,
    /// Name of the column that was written.
    pub column: String,
    /// Number of rows that evaluated to [`ERROR_MARKER`].
    pub faults: usize,
}

/// Evaluate `formula` for every row and store the result under `column`.
///
/// The column name is trimmed and must not be empty. An existing column of
/// the same name is overwritten in place.
pub fn apply_formula(data: &Dataset, formula: &Formula, column: &str) -> Result<FormulaOutput> {
    let column = column.trim();
    if column.is_empty() {
        return Err(TablewrightError::EmptyColumnName);
    }

    let mut faults = 0;
    let out = data
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let value = formula.evaluate(row).unwrap_or_else(|fault| {
                tracing::warn!(row = index, column, %fault, "formula evaluation failed");
                faults += 1;
                Value::Text(ERROR_MARKER.to_string())
            });
            let mut row = row.clone();
            row.insert(column, value);
            row
        })
        .collect();

    tracing::debug!(%formula, column, faults, "applied formula");
    Ok(FormulaOutput {
        data: out,
        column: column.to_string(),
        faults,
    })
}
