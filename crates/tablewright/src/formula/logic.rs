//! Conditional formulas: a single IF/THEN/ELSE over one column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TablewrightError;
use crate::model::{Record, Value, parse_number};

/// Comparison used by a [`LogicFormula`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOperator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "contains")]
    Contains,
}

impl LogicOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOperator::Equal => "==",
            LogicOperator::NotEqual => "!=",
            LogicOperator::Greater => ">",
            LogicOperator::Less => "<",
            LogicOperator::Contains => "contains",
        }
    }

    /// `>` and `<` are numeric and false unless both sides parse.
    fn test(self, cell: &str, check: &str) -> bool {
        match self {
            LogicOperator::Equal => cell == check,
            LogicOperator::NotEqual => cell != check,
            LogicOperator::Contains => cell.contains(check),
            LogicOperator::Greater | LogicOperator::Less => {
                match (parse_number(cell), parse_number(check)) {
                    (Some(a), Some(b)) if self == LogicOperator::Greater => a > b,
                    (Some(a), Some(b)) => a < b,
                    _ => false,
                }
            }
        }
    }
}

impl FromStr for LogicOperator {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "==" => Ok(LogicOperator::Equal),
            "!=" => Ok(LogicOperator::NotEqual),
            ">" => Ok(LogicOperator::Greater),
            "<" => Ok(LogicOperator::Less),
            "contains" => Ok(LogicOperator::Contains),
            _ => Err(TablewrightError::UnknownOperator(s.to_string())),
        }
    }
}

/// `IF column <operator> check THEN when_true ELSE when_false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicFormula {
    pub column: String,
    pub operator: LogicOperator,
    #[serde(default)]
    pub check: String,
    #[serde(rename = "then", default)]
    pub when_true: String,
    #[serde(rename = "else", default)]
    pub when_false: String,
}

impl LogicFormula {
    pub fn new(
        column: impl Into<String>,
        operator: LogicOperator,
        check: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            check: check.into(),
            when_true: String::new(),
            when_false: String::new(),
        }
    }

    /// Set both result strings.
    pub fn then_else(mut self, when_true: impl Into<String>, when_false: impl Into<String>) -> Self {
        self.when_true = when_true.into();
        self.when_false = when_false.into();
        self
    }

    pub(crate) fn evaluate(&self, row: &Record) -> Value {
        let cell = row.text(&self.column);
        let result = if self.operator.test(&cell, &self.check) {
            &self.when_true
        } else {
            &self.when_false
        };
        Value::Text(result.clone())
    }
}

impl fmt::Display for LogicFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IF({} {} {:?}, {:?}, {:?})",
            self.column,
            self.operator.symbol(),
            self.check,
            self.when_true,
            self.when_false
        )
    }
}
