//! Numeric formulas: rounding and arithmetic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TablewrightError;
use crate::model::{Record, Value, parse_number};

/// Built-in numeric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NumericFunction {
    Round,
    Ceil,
    Floor,
    Abs,
    Add,
    Sub,
    Mult,
    Div,
}

impl NumericFunction {
    pub fn name(self) -> &'static str {
        match self {
            NumericFunction::Round => "ROUND",
            NumericFunction::Ceil => "CEIL",
            NumericFunction::Floor => "FLOOR",
            NumericFunction::Abs => "ABS",
            NumericFunction::Add => "ADD",
            NumericFunction::Sub => "SUB",
            NumericFunction::Mult => "MULT",
            NumericFunction::Div => "DIV",
        }
    }

    /// Whether the function takes a second operand.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            NumericFunction::Add | NumericFunction::Sub | NumericFunction::Mult | NumericFunction::Div
        )
    }

    fn apply(self, n1: f64, n2: f64) -> f64 {
        match self {
            NumericFunction::Round => round_half_up(n1),
            NumericFunction::Ceil => n1.ceil(),
            NumericFunction::Floor => n1.floor(),
            NumericFunction::Abs => n1.abs(),
            NumericFunction::Add => n1 + n2,
            NumericFunction::Sub => n1 - n2,
            NumericFunction::Mult => n1 * n2,
            NumericFunction::Div => {
                if n2 == 0.0 {
                    0.0
                } else {
                    n1 / n2
                }
            }
        }
    }
}

impl FromStr for NumericFunction {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ROUND" => Ok(NumericFunction::Round),
            "CEIL" | "CEILING" => Ok(NumericFunction::Ceil),
            "FLOOR" => Ok(NumericFunction::Floor),
            "ABS" => Ok(NumericFunction::Abs),
            "ADD" => Ok(NumericFunction::Add),
            "SUB" | "SUBTRACT" => Ok(NumericFunction::Sub),
            "MULT" | "MULTIPLY" => Ok(NumericFunction::Mult),
            "DIV" | "DIVIDE" => Ok(NumericFunction::Div),
            _ => Err(TablewrightError::UnknownFunction(s.to_string())),
        }
    }
}

/// Nearest integer, halves rounded towards positive infinity.
fn round_half_up(n: f64) -> f64 {
    if n.fract().abs() == 0.5 {
        n.ceil()
    } else {
        n.round()
    }
}

/// A numeric formula.
///
/// The second operand comes from `second_column` when one is set, otherwise
/// from the literal `scalar`. Anything that does not look like a number
/// counts as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFormula {
    pub function: NumericFunction,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<String>,
}

impl NumericFormula {
    pub fn new(function: NumericFunction, column: impl Into<String>) -> Self {
        Self {
            function,
            column: column.into(),
            second_column: None,
            scalar: None,
        }
    }

    /// Take the second operand from another column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.second_column = Some(column.into());
        self
    }

    /// Take the second operand from a literal.
    pub fn with_scalar(mut self, scalar: impl Into<String>) -> Self {
        self.scalar = Some(scalar.into());
        self
    }

    fn second_column(&self) -> Option<&str> {
        self.second_column.as_deref().filter(|c| !c.is_empty())
    }

    /// Overflow and infinite inputs give an infinite result, not a fault.
    pub(crate) fn evaluate(&self, row: &Record) -> Value {
        let n1 = row.get(&self.column).as_number().unwrap_or(0.0);
        let n2 = match self.second_column() {
            Some(column) => row.get(column).as_number(),
            None => self.scalar.as_deref().and_then(parse_number),
        }
        .unwrap_or(0.0);

        Value::Number(self.function.apply(n1, n2))
    }
}

impl fmt::Display for NumericFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.function.is_binary() {
            return write!(f, "{}({})", self.function.name(), self.column);
        }
        let operand = self
            .second_column()
            .or(self.scalar.as_deref())
            .unwrap_or("0");
        write!(f, "{}({}, {})", self.function.name(), self.column, operand)
    }
}
