//! Column partitioner for the people slider.
//!
//! # Responsibility
//! - Pick one base ordering of the fetched list through a pluggable strategy.
//! - Derive every display column as a rotation of that base ordering.
//!
//! # Invariants
//! - Every column has the input length and holds each input item once.
//! - `column_i[k] == base[(k + i) % len]`.
//! - An empty input yields `column_count` empty columns.
//! - The input slice is never mutated.
//! - A strategy returning something other than a permutation of `0..len` is
//!   replaced by the natural order, never indexed blindly.

use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Column count used by the slider.
pub const DEFAULT_COLUMN_COUNT: usize = 6;

/// Strategy choosing the base permutation, expressed as source indices.
///
/// Implementations must return a permutation of `0..len`.
pub trait BaseOrder: Send {
    fn base_order(&mut self, len: usize) -> Vec<usize>;
}

/// Keeps the fetched order (ascending id).
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl BaseOrder for NaturalOrder {
    fn base_order(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

/// Uniform shuffle from the thread-local RNG; the production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffledOrder;

impl BaseOrder for ShuffledOrder {
    fn base_order(&mut self, len: usize) -> Vec<usize> {
        let mut order = (0..len).collect::<Vec<_>>();
        order.shuffle(&mut rand::rng());
        order
    }
}

/// Reproducible shuffle for tests and previews.
#[derive(Debug, Clone)]
pub struct SeededOrder {
    rng: StdRng,
}

impl SeededOrder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl BaseOrder for SeededOrder {
    fn base_order(&mut self, len: usize) -> Vec<usize> {
        let mut order = (0..len).collect::<Vec<_>>();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Returns `base` rotated left by `offset % base.len()`.
pub fn rotate<T: Clone>(base: &[T], offset: usize) -> Vec<T> {
    if base.is_empty() {
        return Vec::new();
    }
    let split = offset % base.len();
    base[split..].iter().chain(&base[..split]).cloned().collect()
}

/// Builds `column_count` columns, column `i` being `base` rotated by `i`.
pub fn rotated_columns<T: Clone>(base: &[T], column_count: usize) -> Vec<Vec<T>> {
    (0..column_count).map(|offset| rotate(base, offset)).collect()
}

/// Applies `order` to `items` and derives the rotated columns.
///
/// Items are cloned handles; pass `Arc`s to share records across columns.
pub fn partition<T: Clone>(
    items: &[T],
    column_count: usize,
    order: &mut dyn BaseOrder,
) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new(); column_count];
    }
    let mut indices = order.base_order(items.len());
    if !is_permutation(&indices, items.len()) {
        warn!(
            "event=partition_order module=partition status=fallback reason=not_a_permutation len={} returned={}",
            items.len(),
            indices.len()
        );
        indices = NaturalOrder.base_order(items.len());
    }
    let base = indices
        .into_iter()
        .map(|index| items[index].clone())
        .collect::<Vec<_>>();
    rotated_columns(&base, column_count)
}

fn is_permutation(indices: &[usize], len: usize) -> bool {
    if indices.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    indices.iter().all(|&index| {
        index < len && !std::mem::replace(&mut seen[index], true)
    })
}

/// Presentation helper: the column followed by itself, for seamless looping.
pub fn looped<T: Clone>(column: &[T]) -> Vec<T> {
    column.iter().chain(column).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::{
        looped, partition, rotate, rotated_columns, BaseOrder, NaturalOrder, SeededOrder,
        ShuffledOrder,
    };
    use std::collections::BTreeSet;

    #[test]
    fn natural_order_with_two_columns_rotates_by_one() {
        let columns = partition(&["A", "B", "C"], 2, &mut NaturalOrder);
        assert_eq!(columns, vec![vec!["A", "B", "C"], vec!["B", "C", "A"]]);
    }

    #[test]
    fn empty_input_yields_empty_columns() {
        let columns = partition::<u8>(&[], 6, &mut ShuffledOrder);
        assert_eq!(columns.len(), 6);
        assert!(columns.iter().all(Vec::is_empty));
    }

    #[test]
    fn rotation_wraps_when_columns_exceed_items() {
        let columns = rotated_columns(&[1, 2], 5);
        assert_eq!(
            columns,
            vec![vec![1, 2], vec![2, 1], vec![1, 2], vec![2, 1], vec![1, 2]]
        );
    }

    #[test]
    fn every_column_is_a_rotation_of_one_permutation() {
        let items = (0..23).collect::<Vec<u32>>();
        let columns = partition(&items, 6, &mut SeededOrder::new(7));
        let base = &columns[0];
        let expected = items.iter().copied().collect::<BTreeSet<_>>();

        for (i, column) in columns.iter().enumerate() {
            assert_eq!(column.len(), items.len());
            assert_eq!(column.iter().copied().collect::<BTreeSet<_>>(), expected);
            for (k, value) in column.iter().enumerate() {
                assert_eq!(*value, base[(k + i) % base.len()]);
            }
        }
    }

    #[test]
    fn same_base_and_count_is_idempotent() {
        let base = ["x", "y", "z", "w"];
        assert_eq!(rotated_columns(&base, 6), rotated_columns(&base, 6));
        let first = partition(&base, 3, &mut SeededOrder::new(42));
        let second = partition(&base, 3, &mut SeededOrder::new(42));
        assert_eq!(first, second);
    }

    struct FixedOrder(Vec<usize>);

    impl BaseOrder for FixedOrder {
        fn base_order(&mut self, _len: usize) -> Vec<usize> {
            self.0.clone()
        }
    }

    #[test]
    fn invalid_strategy_output_falls_back_to_natural_order() {
        let items = ["A", "B", "C"];
        let natural = partition(&items, 2, &mut NaturalOrder);
        for bad in [vec![0, 1, 7], vec![0, 0, 1], vec![2, 1], vec![0, 1, 2, 0]] {
            assert_eq!(partition(&items, 2, &mut FixedOrder(bad.clone())), natural, "{bad:?}");
        }
        assert_eq!(
            partition(&items, 1, &mut FixedOrder(vec![2, 0, 1])),
            vec![vec!["C", "A", "B"]]
        );
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let mut order = ShuffledOrder.base_order(50);
        order.sort_unstable();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn rotate_handles_offsets_beyond_len_and_empty() {
        assert_eq!(rotate(&[1, 2, 3], 4), vec![2, 3, 1]);
        assert!(rotate::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn looped_doubles_without_touching_the_column() {
        let column = vec!['a', 'b'];
        assert_eq!(looped(&column), vec!['a', 'b', 'a', 'b']);
        assert_eq!(column, vec!['a', 'b']);
    }
}
