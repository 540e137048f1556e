//! Comparator-based ascending ordering.

use std::cmp::Ordering;

use feruca::Collator;

use crate::model::{Dataset, Record};

/// Sort key of one cell, computed once per row.
struct SortKey {
    number: Option<f64>,
    text: String,
}

impl SortKey {
    fn new(row: &Record, column: &str) -> Self {
        let value = row.get(column);
        Self {
            number: value.as_number(),
            text: value.to_text(),
        }
    }

    /// Numeric when both cells look like numbers, collated text otherwise.
    ///
    /// Text follows the Unicode root collation: accents and case only break
    /// ties, and lowercase sorts before uppercase.
    fn compare(&self, other: &Self, collator: &mut Collator) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => collator.collate(self.text.as_str(), other.text.as_str()),
        }
    }
}

/// Sort rows ascending by `column`. Rows that compare equal keep their order.
pub fn sort(data: &Dataset, column: &str) -> Dataset {
    let keys: Vec<SortKey> = data.iter().map(|row| SortKey::new(row, column)).collect();
    let mut collator = Collator::default();
    let order = merge_sort((0..keys.len()).collect(), &mut |a, b| {
        keys[a].compare(&keys[b], &mut collator)
    });

    order
        .into_iter()
        .filter_map(|i| data.get(i).cloned())
        .collect()
}

/// Stable merge sort over row indices.
///
/// Mixed numeric/text columns do not give a total order, which the standard
/// library sorts are allowed to panic on; merging never does.
fn merge_sort<F>(mut items: Vec<usize>, cmp: &mut F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(&a), Some(&b)) = (left.peek(), right.peek()) {
        if cmp(b, a) == Ordering::Less {
            merged.push(b);
            right.next();
        } else {
            merged.push(a);
            left.next();
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
