//! Composite-key uniqueness filter.

use std::collections::HashSet;

use crate::model::{Dataset, Record};

/// Separator between cells of a row identity; never occurs in loaded text.
const KEY_SEPARATOR: char = '\u{1f}';

/// Identity of a row over all headers, in header order.
fn row_identity(row: &Record, headers: &[String]) -> String {
    let mut key = String::new();
    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(&row.text(header));
    }
    key
}

/// Drop every row whose values repeat an earlier row.
///
/// Returns the deduplicated dataset and the number of rows removed.
pub fn dedupe(data: &Dataset) -> (Dataset, usize) {
    let headers = data.headers();
    let mut seen = HashSet::new();

    let kept: Dataset = data
        .iter()
        .filter(|row| seen.insert(row_identity(row, &headers)))
        .cloned()
        .collect();

    let removed = data.len() - kept.len();
    (kept, removed)
}
