//! Deterministic ID assignment over composite keys.

use indexmap::IndexMap;

use crate::error::{Result, TablewrightError};
use crate::model::Dataset;

/// Column holding the composite key.
pub const UNIQUE_KEY_COLUMN: &str = "UniqueKey";
/// Column holding the numeric ID.
pub const ID_COLUMN: &str = "ID";

const KEY_SEPARATOR: &str = "|";

/// Append `UniqueKey` and `ID` columns to every row.
///
/// Rows with the same values in `columns` share an ID; IDs start at 1 and
/// follow first-seen order.
pub fn assign_hierarchy(data: &Dataset, columns: &[String]) -> Result<Dataset> {
    if columns.is_empty() {
        return Err(TablewrightError::NoColumnsSelected);
    }

    let mut ids: IndexMap<String, usize> = IndexMap::new();

    let out = data
        .iter()
        .map(|row| {
            let key = columns
                .iter()
                .map(|c| row.text(c))
                .collect::<Vec<_>>()
                .join(KEY_SEPARATOR);
            let next_id = ids.len() + 1;
            let id = *ids.entry(key.clone()).or_insert(next_id);

            let mut row = row.clone();
            row.insert(UNIQUE_KEY_COLUMN, key);
            row.insert(ID_COLUMN, id);
            row
        })
        .collect();

    tracing::debug!(groups = ids.len(), "assigned hierarchy ids");
    Ok(out)
}
