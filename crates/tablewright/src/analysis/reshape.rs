//! Unique-value extraction and transpose.

use indexmap::IndexSet;

use crate::model::{Dataset, Record, Value};

/// Output column of [`unique`].
pub const UNIQUE_COLUMN: &str = "Unique Value";
/// Header-name column of [`transpose`].
pub const FIELD_COLUMN: &str = "Field";
/// Default number of rows pivoted by [`transpose`].
pub const DEFAULT_TRANSPOSE_LIMIT: usize = 50;

/// Hashable identity of a raw value: a number and its text twin differ.
#[derive(PartialEq, Eq, Hash)]
enum RawKey {
    Empty,
    Number(u64),
    Text(String),
}

impl RawKey {
    fn of(value: &Value) -> Self {
        match value {
            Value::Empty => RawKey::Empty,
            // +0.0 and -0.0 are the same value
            Value::Number(n) if *n == 0.0 => RawKey::Number(0.0f64.to_bits()),
            Value::Number(n) => RawKey::Number(n.to_bits()),
            Value::Text(s) => RawKey::Text(s.clone()),
        }
    }
}

/// Distinct raw values of `column`, one record each, in first-seen order.
pub fn unique(data: &Dataset, column: &str) -> Dataset {
    let mut seen = IndexSet::new();
    data.iter()
        .map(|row| row.get(column))
        .filter(|value| seen.insert(RawKey::of(value)))
        .map(|value| Record::new().with(UNIQUE_COLUMN, value.clone()))
        .collect()
}

/// Pivot the first `limit` rows into columns.
///
/// Produces one record per header: `Field` holds the header name and
/// `Row_1..Row_n` hold each included row's value for it. Rows past the
/// limit are dropped.
pub fn transpose(data: &Dataset, headers: &[String], limit: usize) -> Dataset {
    let rows = &data.records()[..data.len().min(limit)];

    headers
        .iter()
        .map(|header| {
            let mut record = Record::new().with(FIELD_COLUMN, header.as_str());
            for (i, row) in rows.iter().enumerate() {
                record.insert(format!("Row_{}", i + 1), row.get(header).clone());
            }
            record
        })
        .collect()
}
