//! Steps shared by the list endpoints: role union, ordering and
//! confirmations. Paging lives on [`crate::options::Page`].

use std::collections::BTreeSet;

use crate::options::OrderDirection;

/// Concatenate per-role batches, keeping the first row seen for each key.
pub(crate) fn union_by<T, K: Ord>(
    batches: impl IntoIterator<Item = Vec<T>>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut seen = BTreeSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|row| seen.insert(key(row)))
        .collect()
}

/// Sort `rows` by `key` in `direction`. Descending reverses the whole key.
pub(crate) fn order_by<T, K: Ord>(
    rows: &mut [T],
    direction: OrderDirection,
    key: impl Fn(&T) -> K,
) {
    match direction {
        OrderDirection::Asc => rows.sort_by(|a, b| key(a).cmp(&key(b))),
        OrderDirection::Desc => rows.sort_by(|a, b| key(b).cmp(&key(a))),
    }
}

/// Blocks mined on top of `block_number`. Zero when the index is empty.
pub fn confirmations(max_block_number: Option<u64>, block_number: u64) -> u64 {
    max_block_number.map_or(0, |max| max.saturating_sub(block_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Page;
    use proptest::prelude::*;

    #[test]
    fn test_union_keeps_first_occurrence() {
        let sent = vec![(1, "sent"), (2, "sent")];
        let received = vec![(2, "received"), (3, "received")];
        let rows = union_by([sent, received], |row| row.0);
        assert_eq!(rows, vec![(1, "sent"), (2, "sent"), (3, "received")]);
    }

    #[test]
    fn test_order_by_direction() {
        let mut rows = vec![(2, 0), (1, 1), (2, 1), (1, 0)];
        order_by(&mut rows, OrderDirection::Asc, |row| *row);
        assert_eq!(rows, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
        order_by(&mut rows, OrderDirection::Desc, |row| *row);
        assert_eq!(rows, vec![(2, 1), (2, 0), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_confirmations() {
        assert_eq!(confirmations(Some(12), 10), 2);
        assert_eq!(confirmations(Some(10), 10), 0);
        assert_eq!(confirmations(None, 10), 0);
    }

    proptest! {
        /// Consecutive pages concatenate back to the full ordered set.
        #[test]
        fn prop_pages_partition_results(len in 0usize..60, size in 1u64..12) {
            let items: Vec<usize> = (0..len).collect();
            let pages = (len as u64).div_ceil(size) + 1;

            let mut joined = Vec::new();
            for number in 1..=pages {
                let page = Page { number, size }.slice(items.clone());
                prop_assert!(page.len() as u64 <= size);
                joined.extend(page);
            }
            prop_assert_eq!(joined, items);
        }

        #[test]
        fn prop_confirmations_count_blocks_above(max in 0u64..1_000_000, below in 0u64..1_000) {
            let block = max.saturating_sub(below);
            prop_assert_eq!(confirmations(Some(max), block), max - block);
            prop_assert_eq!(block + confirmations(Some(max), block), max);
        }
    }
}
