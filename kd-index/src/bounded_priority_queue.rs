//! Fixed-capacity priority queue that evicts its worst entry on overflow.
//!
//! Entries are (value, `f64` priority) pairs kept in a [`MinMaxHeap`], so
//! both the best (minimum-priority) and worst (maximum-priority) entries are
//! visible in O(1). When an `add` pushes the queue past its capacity, the
//! maximum-priority entry is popped and its value handed back to the caller.
//! This is what bounds memory during k-nearest-neighbor search and exposes
//! the current k-th-best distance for pruning decisions.

use std::cmp::Ordering;

use crate::errors::{SpatialError, SpatialResult};
use crate::min_max_heap::MinMaxHeap;

/// A queue entry. Ordering is by priority alone, via `f64::total_cmp`.
#[derive(Debug, Clone)]
struct QueueEntry<T> {
    value: T,
    priority: f64,
}

impl<T> PartialEq for QueueEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority.total_cmp(&other.priority) == Ordering::Equal
    }
}

impl<T> Eq for QueueEntry<T> {}

impl<T> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

/// A priority queue that will not grow beyond a fixed capacity.
///
/// # Examples
///
/// ```rust
/// use kd_index::BoundedPriorityQueue;
///
/// let mut queue = BoundedPriorityQueue::new(2).unwrap();
/// assert_eq!(queue.add("near", 1.0), None);
/// assert_eq!(queue.add("far", 9.0), None);
///
/// // Capacity reached: adding a better entry evicts the worst one.
/// assert_eq!(queue.add("nearer", 0.5), Some("far"));
/// assert_eq!(queue.peek_max_priority().unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedPriorityQueue<T> {
    max_size: usize,
    heap: MinMaxHeap<QueueEntry<T>>,
}

impl<T> BoundedPriorityQueue<T> {
    /// Creates a queue holding at most `max_size` entries.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] when `max_size` is zero.
    pub fn new(max_size: usize) -> SpatialResult<BoundedPriorityQueue<T>> {
        if max_size == 0 {
            return Err(SpatialError::InvalidArgument(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(BoundedPriorityQueue {
            max_size,
            heap: MinMaxHeap::new(),
        })
    }

    /// Inserts `value` with `priority`. If the insertion pushes the queue
    /// past its capacity, the maximum-priority entry is popped and its value
    /// returned as the eviction signal; otherwise `None`.
    pub fn add(&mut self, value: T, priority: f64) -> Option<T> {
        self.heap.push(QueueEntry { value, priority });
        if self.heap.len() > self.max_size {
            self.heap.pop_max().ok().map(|entry| entry.value)
        } else {
            None
        }
    }

    /// Returns the value of the minimum-priority entry.
    pub fn peek_min_value(&self) -> SpatialResult<&T> {
        self.heap.peek_min().map(|entry| &entry.value)
    }

    /// Returns the value of the maximum-priority entry.
    pub fn peek_max_value(&self) -> SpatialResult<&T> {
        self.heap.peek_max().map(|entry| &entry.value)
    }

    /// Returns the minimum priority currently held.
    pub fn peek_min_priority(&self) -> SpatialResult<f64> {
        self.heap.peek_min().map(|entry| entry.priority)
    }

    /// Returns the maximum priority currently held.
    pub fn peek_max_priority(&self) -> SpatialResult<f64> {
        self.heap.peek_max().map(|entry| entry.priority)
    }

    /// Removes the minimum-priority entry and returns its value.
    pub fn pop_min_value(&mut self) -> SpatialResult<T> {
        self.heap.pop_min().map(|entry| entry.value)
    }

    /// Removes the maximum-priority entry and returns its value.
    pub fn pop_max_value(&mut self) -> SpatialResult<T> {
        self.heap.pop_max().map(|entry| entry.value)
    }

    /// Returns the number of entries held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` when the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.heap.len() == self.max_size
    }

    /// Returns the configured capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl<T: Clone> BoundedPriorityQueue<T> {
    /// Returns all values ordered by ascending priority, O(N log N).
    ///
    /// The queue is drained through `pop_min` and every entry is reinserted
    /// afterwards, so the caller-visible state is unchanged.
    pub fn to_vec_by_priority(&mut self) -> Vec<T> {
        let mut entries = Vec::with_capacity(self.heap.len());
        let mut values = Vec::with_capacity(self.heap.len());
        while let Ok(entry) = self.heap.pop_min() {
            values.push(entry.value.clone());
            entries.push(entry);
        }
        for entry in entries {
            self.heap.push(entry);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            BoundedPriorityQueue::<i32>::new(0),
            Err(SpatialError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_below_capacity_never_evicts() {
        let mut queue = BoundedPriorityQueue::new(3).unwrap();
        assert_eq!(queue.add("a", 3.0), None);
        assert_eq!(queue.add("b", 1.0), None);
        assert_eq!(queue.add("c", 2.0), None);
        assert_eq!(queue.len(), 3);
        assert!(queue.is_full());
    }

    #[test]
    fn test_overflow_evicts_max_priority_value() {
        let mut queue = BoundedPriorityQueue::new(3).unwrap();
        queue.add("a", 3.0);
        queue.add("b", 1.0);
        queue.add("c", 2.0);

        // "a" holds the maximum priority at the moment of overflow.
        assert_eq!(queue.add("d", 0.5), Some("a"));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek_max_priority().unwrap(), 2.0);
    }

    #[test]
    fn test_overflow_can_evict_the_new_value() {
        let mut queue = BoundedPriorityQueue::new(2).unwrap();
        queue.add("a", 1.0);
        queue.add("b", 2.0);
        assert_eq!(queue.add("worst", 10.0), Some("worst"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_peeks() {
        let mut queue = BoundedPriorityQueue::new(5).unwrap();
        queue.add(10, 4.0);
        queue.add(20, 2.0);
        queue.add(30, 6.0);

        assert_eq!(*queue.peek_min_value().unwrap(), 20);
        assert_eq!(*queue.peek_max_value().unwrap(), 30);
        assert_eq!(queue.peek_min_priority().unwrap(), 2.0);
        assert_eq!(queue.peek_max_priority().unwrap(), 6.0);
    }

    #[test]
    fn test_pops() {
        let mut queue = BoundedPriorityQueue::new(5).unwrap();
        queue.add(10, 4.0);
        queue.add(20, 2.0);
        queue.add(30, 6.0);

        assert_eq!(queue.pop_min_value().unwrap(), 20);
        assert_eq!(queue.pop_max_value().unwrap(), 30);
        assert_eq!(queue.pop_min_value().unwrap(), 10);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue_errors() {
        let mut queue: BoundedPriorityQueue<i32> = BoundedPriorityQueue::new(2).unwrap();
        assert!(matches!(
            queue.peek_min_value(),
            Err(SpatialError::EmptyStructure(_))
        ));
        assert!(matches!(
            queue.pop_max_value(),
            Err(SpatialError::EmptyStructure(_))
        ));
    }

    #[test]
    fn test_to_vec_by_priority_is_sorted_and_non_destructive() {
        let mut queue = BoundedPriorityQueue::new(10).unwrap();
        queue.add("c", 3.0);
        queue.add("a", 1.0);
        queue.add("d", 4.0);
        queue.add("b", 2.0);

        assert_eq!(queue.to_vec_by_priority(), vec!["a", "b", "c", "d"]);

        // State is restored after the snapshot.
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.peek_min_priority().unwrap(), 1.0);
        assert_eq!(queue.peek_max_priority().unwrap(), 4.0);
        assert_eq!(queue.to_vec_by_priority(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(3);
        let capacity = 8;
        let mut queue = BoundedPriorityQueue::new(capacity).unwrap();
        let mut held: Vec<f64> = Vec::new();

        for i in 0..200 {
            let priority = rng.gen_range(0.0..100.0);
            let evicted = queue.add(i, priority);
            held.push(priority);

            if evicted.is_some() {
                // The eviction must have removed the max priority present
                // just after the insert.
                let max = held.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let pos = held.iter().position(|&p| p == max).unwrap();
                held.swap_remove(pos);
            }
            assert!(queue.len() <= capacity);
            let expected_max = held.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(queue.peek_max_priority().unwrap(), expected_max);
        }
        assert!(queue.is_full());
    }
}
