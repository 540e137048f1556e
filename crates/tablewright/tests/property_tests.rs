//! Property-based tests for the dataset operations.
//!
//! Each generated dataset has three columns drawn from a small alphabet so
//! that duplicates, ties and shared hierarchy keys are common.
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p tablewright --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use tablewright::analysis::aggregate;
use tablewright::formula::apply_formula;
use tablewright::ops::{assign_hierarchy, dedupe, filter, sort};
use tablewright::{
    AggregateFunction, Dataset, FilterOperator, NumericFormula, NumericFunction, Record, Value,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Cells: blanks, small numbers and short words of mixed case.
fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Empty),
        (-5i64..5).prop_map(Value::from),
        "[aAbB]{1,2}".prop_map(Value::from),
    ]
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((cell(), cell(), cell()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(a, b, c)| Record::new().with("a", a).with("b", b).with("c", c))
            .collect()
    })
}

fn operator() -> impl Strategy<Value = FilterOperator> {
    prop_oneof![
        Just(FilterOperator::Contains),
        Just(FilterOperator::Equals),
        Just(FilterOperator::StartsWith),
        Just(FilterOperator::EndsWith),
    ]
}

fn row_key(row: &Record, headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| row.text(h)).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn filter_is_deterministic_and_shrinks(
        data in dataset(),
        op in operator(),
        value in "[aAbB1-]{0,2}",
    ) {
        let first = filter(&data, "a", &op, &value);
        let second = filter(&data, "a", &op, &value);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= data.len());
    }

    #[test]
    fn sort_is_a_stable_permutation(data in dataset()) {
        // tag each row with its input position
        let tagged: Dataset = data
            .iter()
            .enumerate()
            .map(|(i, row)| row.clone().with("pos", i))
            .collect();

        let sorted = sort(&tagged, "a");
        prop_assert_eq!(sorted.len(), tagged.len());

        let mut positions: Vec<usize> = sorted
            .iter()
            .filter_map(|r| r.get("pos").as_number())
            .map(|n| n as usize)
            .collect();

        // rows with identical sort cells keep their relative order
        let cells: Vec<Value> = sorted.iter().map(|r| r.get("a").clone()).collect();
        for i in 0..cells.len() {
            for j in (i + 1)..cells.len() {
                if cells[i] == cells[j] {
                    prop_assert!(positions[i] < positions[j]);
                }
            }
        }

        positions.sort_unstable();
        prop_assert_eq!(positions, (0..tagged.len()).collect::<Vec<_>>());
    }

    #[test]
    fn dedupe_keeps_first_of_each_distinct_row(data in dataset()) {
        let (out, removed) = dedupe(&data);
        let headers = data.headers();

        prop_assert_eq!(out.len() + removed, data.len());

        let keys: Vec<Vec<String>> = out.iter().map(|r| row_key(r, &headers)).collect();
        let distinct: HashSet<&Vec<String>> = keys.iter().collect();
        prop_assert_eq!(distinct.len(), keys.len());

        let mut seen = HashSet::new();
        let firsts: Vec<&Record> = data
            .iter()
            .filter(|r| seen.insert(row_key(r, &headers)))
            .collect();
        prop_assert_eq!(firsts, out.iter().collect::<Vec<_>>());
    }

    #[test]
    fn hierarchy_ids_follow_first_seen_keys(data in dataset()) {
        let columns = vec!["a".to_string(), "b".to_string()];
        let out = assign_hierarchy(&data, &columns).unwrap();

        let mut next_id = 1.0;
        let mut ids: Vec<(Vec<String>, f64)> = Vec::new();
        for row in &out {
            let key = row_key(row, &columns);
            let id = row.get("ID").as_number().unwrap();
            let known = ids.iter().find(|(k, _)| *k == key).map(|(_, id)| *id);
            match known {
                Some(known) => {
                    prop_assert_eq!(id, known);
                }
                None => {
                    prop_assert_eq!(id, next_id);
                    ids.push((key, id));
                    next_id += 1.0;
                }
            }
        }
    }

    #[test]
    fn count_totals_match_row_count(data in dataset()) {
        let groups = aggregate(&data, "a", "b", AggregateFunction::Count);
        let total: f64 = groups
            .iter()
            .filter_map(|r| r.get("COUNT_b").as_number())
            .sum();

        prop_assert_eq!(total as usize, data.len());
    }

    #[test]
    fn division_is_always_finite(data in dataset()) {
        let formula = NumericFormula::new(NumericFunction::Div, "a").with_column("b");
        let out = apply_formula(&data, &formula.into(), "q").unwrap();

        prop_assert_eq!(out.faults, 0);
        for row in &out.data {
            let q = row.get("q").as_number();
            prop_assert!(q.is_some_and(f64::is_finite));
        }
    }
}
