//! Group-by with a fixed set of aggregate functions.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TablewrightError;
use crate::model::{Dataset, Record, Value};

/// Group label used for rows with an empty or missing group cell.
pub const BLANK_GROUP: &str = "(Blank)";

/// Built-in aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Sum,
    Average,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Average => "AVERAGE",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// Name of the result column for `value_column`.
    pub fn column_name(self, value_column: &str) -> String {
        format!("{}_{}", self.name(), value_column)
    }

    /// Reduce one group. `None` means the group had nothing to reduce.
    fn reduce(self, rows: usize, values: &[f64]) -> Option<f64> {
        match self {
            AggregateFunction::Count => Some(rows as f64),
            AggregateFunction::Sum => Some(values.iter().sum()),
            AggregateFunction::Average => {
                if values.is_empty() {
                    Some(0.0)
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                }
            }
            AggregateFunction::Min => values.iter().copied().reduce(f64::min),
            AggregateFunction::Max => values.iter().copied().reduce(f64::max),
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = TablewrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COUNT" => Ok(AggregateFunction::Count),
            "SUM" => Ok(AggregateFunction::Sum),
            "AVERAGE" | "AVG" | "MEAN" => Ok(AggregateFunction::Average),
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            _ => Err(TablewrightError::UnknownFunction(s.to_string())),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Default)]
struct Group {
    rows: usize,
    values: Vec<f64>,
}

/// Group rows by `group_column` and reduce `value_column` in each group.
///
/// Groups appear in first-seen order. The result has one record per group
/// with the group label under `group_column` and the aggregate under
/// `<FUNC>_<value_column>`. MIN and MAX of a group without any numeric
/// value are left empty.
pub fn aggregate(
    data: &Dataset,
    group_column: &str,
    value_column: &str,
    function: AggregateFunction,
) -> Dataset {
    let mut groups: IndexMap<String, Group> = IndexMap::new();

    for row in data {
        let cell = row.get(group_column);
        let key = if cell.is_blank() {
            BLANK_GROUP.to_string()
        } else {
            cell.to_text()
        };

        let group = groups.entry(key).or_default();
        group.rows += 1;
        if let Some(n) = row.get(value_column).as_number() {
            group.values.push(n);
        }
    }

    let result_column = function.column_name(value_column);
    groups
        .into_iter()
        .map(|(key, group)| {
            let result = match function.reduce(group.rows, &group.values) {
                Some(n) => Value::Number(n),
                None => {
                    tracing::warn!(group = %key, %function, "no numeric values in group");
                    Value::Empty
                }
            };
            Record::new()
                .with(group_column, key)
                .with(result_column.as_str(), result)
        })
        .collect()
}
