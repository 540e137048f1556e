//! Scalar cell values and their string/number coercions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Longest numeric prefix accepted by [`parse_number`].
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("numeric prefix pattern is valid")
});

/// A single cell of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or blank cell.
    #[default]
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Any other cell, kept verbatim.
    Text(String),
}

impl Value {
    /// Type a raw cell read from a text file.
    ///
    /// Blank cells become [`Value::Empty`], cells whose whole trimmed content
    /// is a finite number become [`Value::Number`], everything else is text.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Empty;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// The numeric reading of this value, if it looks like a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            Value::Number(_) | Value::Empty => None,
            Value::Text(s) => parse_number(s),
        }
    }

    /// The string form used for comparisons, keys and export.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Empty => String::new(),
        }
    }

    /// Whether this cell is absent or an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Empty => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or_default(),
            serde_json::Value::String(s) if s.is_empty() => Value::Empty,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        }
    }
}

/// Parse the longest numeric prefix of `s`, skipping leading whitespace.
///
/// `"12abc"` reads as 12 and `".5"` as 0.5; a string with no numeric prefix
/// is not a number.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let prefix = NUMERIC_PREFIX.find(trimmed)?.as_str();
    prefix.parse::<f64>().ok()
}

/// Parse the integer prefix of `s` the same way, truncating any fraction.
pub fn parse_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse::<i64>().ok()
}

/// Render a number the way a spreadsheet cell shows it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if !(1e-6..1e21).contains(&n.abs()) {
        // exponent form with an explicit sign: 1e+21, 1.5e-8
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  3.5"), Some(3.5));
        assert_eq!(parse_number("12abc"), Some(12.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("-1e3"), Some(-1000.0));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("e5"), None);
    }

    #[test]
    fn test_parse_integer_prefix() {
        assert_eq!(parse_integer("3"), Some(3));
        assert_eq!(parse_integer(" 7 chars"), Some(7));
        assert_eq!(parse_integer("2.9"), Some(2));
        assert_eq!(parse_integer("-2"), Some(-2));
        assert_eq!(parse_integer("x"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-8), "1.5e-8");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_infer() {
        assert_eq!(Value::infer(""), Value::Empty);
        assert_eq!(Value::infer("12"), Value::Number(12.0));
        assert_eq!(Value::infer(" 1.5 "), Value::Number(1.5));
        assert_eq!(Value::infer("12abc"), Value::Text("12abc".to_string()));
        assert_eq!(Value::infer("NaN"), Value::Text("NaN".to_string()));
        assert_eq!(Value::infer("inf"), Value::Text("inf".to_string()));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Number(2.0).as_number(), Some(2.0));
        assert_eq!(Value::from("7 apples").as_number(), Some(7.0));
        assert_eq!(Value::Empty.as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Empty.to_text(), "");
        assert_eq!(Value::Number(10.0).to_text(), "10");
        assert_eq!(Value::from("abc").to_text(), "abc");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(serde_json::json!(null)), Value::Empty);
        assert_eq!(Value::from(serde_json::json!(3)), Value::Number(3.0));
        assert_eq!(Value::from(serde_json::json!("")), Value::Empty);
        assert_eq!(Value::from(serde_json::json!(true)), Value::from("true"));
    }
}
