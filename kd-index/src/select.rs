//! Order-statistic selection (quickselect).
//!
//! Finds the element that would occupy a given rank in sorted order without
//! fully sorting the input. The pivot is chosen uniformly at random, giving
//! expected O(N) time; adversarial inputs can degrade to O(N²), which is
//! accepted rather than mitigated.
//!
//! The in-place variants additionally leave the input weakly partitioned
//! around the selected element: everything before index `n - 1` compares
//! less-or-equal to it, everything after compares greater-or-equal. Balanced
//! k-d tree construction builds its median splits on top of this layout.

use std::cmp::Ordering;

use rand::Rng;

use crate::errors::{SpatialError, SpatialResult};

/// Returns the `n`-th smallest element (1-based) under the natural order.
///
/// Operates on a private copy; the caller's slice is left untouched.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidArgument`] when `n` is outside `[1, N]`.
pub fn select<T: Ord + Clone>(items: &[T], n: usize) -> SpatialResult<T> {
    select_by(items, n, |a, b| a.cmp(b))
}

/// Returns the `n`-th smallest element (1-based) under `compare`.
///
/// Operates on a private copy; the caller's slice is left untouched.
pub fn select_by<T, F>(items: &[T], n: usize, compare: F) -> SpatialResult<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut copy = items.to_vec();
    select_in_place_by(&mut copy, n, compare).map(|selected| selected.clone())
}

/// In-place variant of [`select`] for types with a natural order.
pub fn select_in_place<T: Ord>(items: &mut [T], n: usize) -> SpatialResult<&T> {
    select_in_place_by(items, n, |a, b| a.cmp(b))
}

/// In-place variant of [`select_by`].
///
/// On success the selected element sits at index `n - 1`, preceded only by
/// smaller-or-equal elements and followed only by greater-or-equal ones.
pub fn select_in_place_by<T, F>(items: &mut [T], n: usize, compare: F) -> SpatialResult<&T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    select_in_place_by_rng(items, n, compare, &mut rand::thread_rng())
}

/// Core selection routine with a caller-supplied random source.
///
/// Pivots are drawn from `rng`; seed a [`rand::rngs::StdRng`] to make a run
/// deterministic. The other selection functions delegate here with
/// [`rand::thread_rng`].
pub fn select_in_place_by_rng<'a, T, F, R>(
    items: &'a mut [T],
    n: usize,
    mut compare: F,
    rng: &mut R,
) -> SpatialResult<&'a T>
where
    F: FnMut(&T, &T) -> Ordering,
    R: Rng + ?Sized,
{
    if n < 1 || n > items.len() {
        return Err(SpatialError::InvalidArgument(format!(
            "rank must be in the inclusive range [1, {}], got {}",
            items.len(),
            n
        )));
    }

    let mut start = 0;
    let mut end = items.len() - 1;
    loop {
        // Move a random pivot to the front, then sweep everything smaller
        // than it to the left of `boundary`.
        let pivot_index = rng.gen_range(start..=end);
        items.swap(start, pivot_index);
        let mut boundary = start + 1;
        for i in (start + 1)..=end {
            if compare(&items[i], &items[start]) == Ordering::Less {
                items.swap(i, boundary);
                boundary += 1;
            }
        }
        boundary -= 1;
        items.swap(start, boundary);

        let pivot_rank = boundary + 1;
        match pivot_rank.cmp(&n) {
            Ordering::Equal => return Ok(&items[boundary]),
            Ordering::Less => start = boundary + 1,
            Ordering::Greater => end = boundary - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_select_matches_sorted_order() {
        let items = vec![9, 1, 8, 2, 7, 3, 6, 4, 5];
        let mut sorted = items.clone();
        sorted.sort();

        for n in 1..=items.len() {
            assert_eq!(select(&items, n).unwrap(), sorted[n - 1]);
        }
    }

    #[test]
    fn test_select_does_not_reorder_input() {
        let items = vec![5, 3, 9, 1, 7];
        let original = items.clone();
        select(&items, 3).unwrap();
        assert_eq!(items, original);
    }

    #[test]
    fn test_select_single_element() {
        assert_eq!(select(&[42], 1).unwrap(), 42);
    }

    #[test]
    fn test_select_with_duplicates() {
        let items = vec![3, 1, 3, 1, 2, 2, 3];
        let mut sorted = items.clone();
        sorted.sort();

        for n in 1..=items.len() {
            assert_eq!(select(&items, n).unwrap(), sorted[n - 1]);
        }
    }

    #[test]
    fn test_select_rank_out_of_range() {
        let items = vec![1, 2, 3];
        assert!(matches!(
            select(&items, 0),
            Err(SpatialError::InvalidArgument(_))
        ));
        assert!(matches!(
            select(&items, 4),
            Err(SpatialError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_select_empty_input() {
        let items: Vec<i32> = vec![];
        assert!(matches!(
            select(&items, 1),
            Err(SpatialError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_select_by_reversed_comparator() {
        let items = vec![4, 2, 9, 6, 1];
        // Reversed order makes rank 1 the maximum.
        assert_eq!(select_by(&items, 1, |a, b| b.cmp(a)).unwrap(), 9);
        assert_eq!(select_by(&items, 5, |a, b| b.cmp(a)).unwrap(), 1);
    }

    #[test]
    fn test_select_in_place_partitions_around_result() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<i64> = (0..200).map(|_| rng.gen_range(-50..50)).collect();
        let n = 77;

        let selected = *select_in_place(&mut items, n).unwrap();
        assert_eq!(items[n - 1], selected);
        assert!(items[..n - 1].iter().all(|&v| v <= selected));
        assert!(items[n..].iter().all(|&v| v >= selected));
    }

    #[test]
    fn test_select_in_place_by_rng_is_deterministic() {
        let items: Vec<u32> = vec![13, 5, 8, 21, 1, 3, 2, 34, 55];

        let mut first = items.clone();
        let mut rng = StdRng::seed_from_u64(99);
        let a = *select_in_place_by_rng(&mut first, 4, |x, y| x.cmp(y), &mut rng).unwrap();

        let mut second = items.clone();
        let mut rng = StdRng::seed_from_u64(99);
        let b = *select_in_place_by_rng(&mut second, 4, |x, y| x.cmp(y), &mut rng).unwrap();

        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_random_inputs_against_sort() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..50 {
            let len = rng.gen_range(1..60);
            let items: Vec<i32> = (0..len).map(|_| rng.gen_range(-20..20)).collect();
            let mut sorted = items.clone();
            sorted.sort();

            let n = rng.gen_range(1..=len);
            assert_eq!(select(&items, n).unwrap(), sorted[n - 1]);
        }
    }
}
