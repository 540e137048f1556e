//! Text formulas: string functions over one or more columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FormulaFault;
use crate::error::TablewrightError;
use crate::model::{Record, Value, parse_integer};

/// Built-in text functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextFunction {
    Trim,
    Upper,
    Lower,
    Len,
    Left,
    Right,
    Concat,
}

impl TextFunction {
    pub fn name(self) -> &'static str {
        match self {
            TextFunction::Trim => "TRIM",
            TextFunction::Upper => "UPPER",
            TextFunction::Lower => "LOWER",
            TextFunction::Len => "LEN",
            TextFunction::Left => "LEFT",
            TextFunction::Right => "RIGHT",
            TextFunction::Concat => "CONCAT",
        }
    }
}

impl FromStr for TextFunction {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRIM" => Ok(TextFunction::Trim),
            "UPPER" => Ok(TextFunction::Upper),
            "LOWER" => Ok(TextFunction::Lower),
            "LEN" => Ok(TextFunction::Len),
            "LEFT" => Ok(TextFunction::Left),
            "RIGHT" => Ok(TextFunction::Right),
            "CONCAT" => Ok(TextFunction::Concat),
            _ => Err(TablewrightError::UnknownFunction(s.to_string())),
        }
    }
}

/// A text formula.
///
/// `column` is the source of every function except CONCAT, which joins
/// `columns` in order. `argument` is the character count of LEFT/RIGHT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFormula {
    pub function: TextFunction,
    #[serde(default)]
    pub column: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
}

impl TextFormula {
    /// A single-column text formula.
    pub fn new(function: TextFunction, column: impl Into<String>) -> Self {
        Self {
            function,
            column: column.into(),
            columns: Vec::new(),
            argument: None,
        }
    }

    /// CONCAT over `columns`, in the given order.
    pub fn concat<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            function: TextFunction::Concat,
            column: String::new(),
            columns: columns.into_iter().map(Into::into).collect(),
            argument: None,
        }
    }

    /// Set the LEFT/RIGHT character count.
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Character count for LEFT/RIGHT: 1 when missing, unparsable or zero.
    fn count(&self) -> i64 {
        match self.argument.as_deref().and_then(parse_integer) {
            Some(0) | None => 1,
            Some(n) => n,
        }
    }

    pub(crate) fn evaluate(&self, row: &Record) -> Result<Value, FormulaFault> {
        let source = || row.text(&self.column);

        let value = match self.function {
            TextFunction::Trim => Value::Text(source().trim().to_string()),
            TextFunction::Upper => Value::Text(source().to_uppercase()),
            TextFunction::Lower => Value::Text(source().to_lowercase()),
            TextFunction::Len => Value::from(source().chars().count()),
            // a negative LEFT count keeps nothing
            TextFunction::Left => {
                let n = usize::try_from(self.count()).unwrap_or(0);
                Value::Text(source().chars().take(n).collect())
            }
            // a negative RIGHT count drops that many leading characters
            TextFunction::Right => {
                let text = source();
                let n = self.count();
                let skip = match usize::try_from(n) {
                    Ok(n) => text.chars().count().saturating_sub(n),
                    Err(_) => usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX),
                };
                Value::Text(text.chars().skip(skip).collect())
            }
            TextFunction::Concat => {
                if self.columns.is_empty() {
                    return Err(FormulaFault::NoColumns);
                }
                Value::Text(self.columns.iter().map(|c| row.text(c)).collect())
            }
        };
        Ok(value)
    }
}

impl fmt::Display for TextFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.function {
            TextFunction::Concat => write!(f, "CONCAT({})", self.columns.join(", ")),
            TextFunction::Left | TextFunction::Right => write!(
                f,
                "{}({}, {})",
                self.function.name(),
                self.column,
                self.argument.as_deref().unwrap_or("1")
            ),
            other => write!(f, "{}({})", other.name(), self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Record {
        Record::new()
            .with("name", "  Ada Lovelace ")
            .with("first", "foo")
            .with("second", "bar")
            .with("n", 42.0)
    }

    fn eval(formula: TextFormula) -> Value {
        formula.evaluate(&row()).unwrap()
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(eval(TextFormula::new(TextFunction::Trim, "name")), Value::from("Ada Lovelace"));
        assert_eq!(eval(TextFormula::new(TextFunction::Upper, "first")), Value::from("FOO"));
        assert_eq!(eval(TextFormula::new(TextFunction::Lower, "name")), Value::from("  ada lovelace "));
    }

    #[test]
    fn test_len_is_numeric() {
        assert_eq!(eval(TextFormula::new(TextFunction::Len, "first")), Value::Number(3.0));
        assert_eq!(eval(TextFormula::new(TextFunction::Len, "missing")), Value::Number(0.0));
        assert_eq!(eval(TextFormula::new(TextFunction::Len, "n")), Value::Number(2.0));
    }

    #[test]
    fn test_left_right() {
        let left = TextFormula::new(TextFunction::Left, "first").with_argument("2");
        assert_eq!(eval(left), Value::from("fo"));

        let right = TextFormula::new(TextFunction::Right, "second").with_argument("2");
        assert_eq!(eval(right), Value::from("ar"));

        let long = TextFormula::new(TextFunction::Right, "second").with_argument("10");
        assert_eq!(eval(long), Value::from("bar"));
    }

    #[test]
    fn test_count_defaults_to_one() {
        let none = TextFormula::new(TextFunction::Left, "first");
        assert_eq!(eval(none), Value::from("f"));

        let junk = TextFormula::new(TextFunction::Right, "first").with_argument("abc");
        assert_eq!(eval(junk), Value::from("o"));

        let zero = TextFormula::new(TextFunction::Left, "first").with_argument("0");
        assert_eq!(eval(zero), Value::from("f"));
    }

    #[test]
    fn test_negative_count() {
        let row = Record::new().with("code", "ABCDE");

        let left = TextFormula::new(TextFunction::Left, "code").with_argument("-2");
        assert_eq!(left.evaluate(&row), Ok(Value::from("")));

        let right = TextFormula::new(TextFunction::Right, "code").with_argument("-2");
        assert_eq!(right.evaluate(&row), Ok(Value::from("CDE")));

        let past_end = TextFormula::new(TextFunction::Right, "code").with_argument("-9");
        assert_eq!(past_end.evaluate(&row), Ok(Value::from("")));
    }

    #[test]
    fn test_concat_in_selection_order() {
        assert_eq!(eval(TextFormula::concat(["first", "second"])), Value::from("foobar"));
        assert_eq!(eval(TextFormula::concat(["second", "n", "missing"])), Value::from("bar42"));
    }

    #[test]
    fn test_concat_without_columns_is_a_fault() {
        let formula = TextFormula::concat(Vec::<String>::new());
        assert_eq!(formula.evaluate(&row()), Err(FormulaFault::NoColumns));
    }

    #[test]
    fn test_parse_function() {
        assert_eq!("upper".parse::<TextFunction>().unwrap(), TextFunction::Upper);
        assert!("REVERSE".parse::<TextFunction>().is_err());
    }
}
