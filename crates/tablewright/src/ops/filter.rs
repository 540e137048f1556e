//! Predicate row selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Dataset;

/// Comparison applied by [`filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    /// Any other name. Rows are never removed by an unrecognized operator.
    Unrecognized(String),
}

impl FilterOperator {
    fn matches(&self, cell: &str, needle: &str) -> bool {
        match self {
            FilterOperator::Contains => cell.contains(needle),
            FilterOperator::Equals => cell == needle,
            FilterOperator::StartsWith => cell.starts_with(needle),
            FilterOperator::EndsWith => cell.ends_with(needle),
            FilterOperator::Unrecognized(_) => true,
        }
    }
}

impl FromStr for FilterOperator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "contains" => FilterOperator::Contains,
            "equals" => FilterOperator::Equals,
            "startswith" | "starts-with" | "starts_with" | "starts" => FilterOperator::StartsWith,
            "endswith" | "ends-with" | "ends_with" | "ends" => FilterOperator::EndsWith,
            _ => FilterOperator::Unrecognized(s.to_string()),
        })
    }
}

impl From<String> for FilterOperator {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(op) => op,
            Err(never) => match never {},
        }
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOperator::Contains => f.write_str("contains"),
            FilterOperator::Equals => f.write_str("equals"),
            FilterOperator::StartsWith => f.write_str("starts-with"),
            FilterOperator::EndsWith => f.write_str("ends-with"),
            FilterOperator::Unrecognized(name) => f.write_str(name),
        }
    }
}

/// Keep the rows whose `column` matches `value` under `operator`.
///
/// Both sides are compared case-insensitively on their string forms; a
/// missing cell compares as the empty string. Row order is preserved.
pub fn filter(data: &Dataset, column: &str, operator: &FilterOperator, value: &str) -> Dataset {
    if let FilterOperator::Unrecognized(name) = operator {
        tracing::warn!(operator = %name, "unrecognized filter operator, keeping all rows");
    }

    let needle = value.to_lowercase();
    data.iter()
        .filter(|row| operator.matches(&row.text(column).to_lowercase(), &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Value};

    fn cities() -> Dataset {
        vec![
            Record::new().with("city", "New York").with("pop", 8.3),
            Record::new().with("city", "Newark").with("pop", 0.3),
            Record::new().with("city", "Boston").with("pop", 0.7),
            Record::new().with("city", Value::Empty).with("pop", 1.0),
        ]
        .into()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let out = filter(&cities(), "city", &FilterOperator::Contains, "NEW");
        assert_eq!(out.column_text("city"), vec!["New York", "Newark"]);
    }

    #[test]
    fn test_equals() {
        let out = filter(&cities(), "city", &FilterOperator::Equals, "boston");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_starts_and_ends_with() {
        let starts = filter(&cities(), "city", &FilterOperator::StartsWith, "new");
        assert_eq!(starts.len(), 2);

        let ends = filter(&cities(), "city", &FilterOperator::EndsWith, "ark");
        assert_eq!(ends.column_text("city"), vec!["Newark"]);
    }

    #[test]
    fn test_numbers_compare_as_text() {
        let out = filter(&cities(), "pop", &FilterOperator::StartsWith, "0.");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_missing_cell_is_empty_string() {
        let out = filter(&cities(), "city", &FilterOperator::Equals, "");
        assert_eq!(out.len(), 1);

        let out = filter(&cities(), "nope", &FilterOperator::Equals, "");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_unrecognized_operator_keeps_every_row() {
        let op: FilterOperator = "between".parse().unwrap();
        assert_eq!(op, FilterOperator::Unrecognized("between".to_string()));

        let out = filter(&cities(), "city", &op, "zzz");
        assert_eq!(out, cities());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("starts".parse::<FilterOperator>().unwrap(), FilterOperator::StartsWith);
        assert_eq!("Ends-With".parse::<FilterOperator>().unwrap(), FilterOperator::EndsWith);
        assert_eq!("startsWith".parse::<FilterOperator>().unwrap(), FilterOperator::StartsWith);
        assert_eq!("endsWith".parse::<FilterOperator>().unwrap(), FilterOperator::EndsWith);
    }
}
