//! Dual-ended heap with O(1) access to both extremes.
//!
//! The heap is an implicit complete binary tree stored in a `Vec`. Levels
//! alternate role by depth: a node on an even level is less than or equal to
//! everything in its subtree, a node on an odd level is greater than or
//! equal to everything in its subtree. The minimum therefore sits at the
//! root, and the maximum is the root itself (size 1) or one of the root's
//! two children.
//!
//! `push`, `pop_min`, and `pop_max` are O(log N); `from_vec` repairs bottom-up
//! in O(N).

use crate::errors::{SpatialError, SpatialResult};

/// Depth of index `i` in the implicit tree.
fn level(i: usize) -> u32 {
    (i + 1).ilog2()
}

/// Even levels hold subtree minima, odd levels hold subtree maxima.
fn is_min_level(i: usize) -> bool {
    level(i) % 2 == 0
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// Grandchildren of `i` occupy the index range `[4i + 3, 4i + 6]`.
fn is_grandchild(i: usize, descendant: usize) -> bool {
    descendant >= 4 * i + 3
}

/// An array-backed min-max heap.
///
/// # Examples
///
/// ```rust
/// use kd_index::MinMaxHeap;
///
/// let mut heap = MinMaxHeap::from_vec(vec![5, 1, 9, 3]);
/// assert_eq!(*heap.peek_min().unwrap(), 1);
/// assert_eq!(*heap.peek_max().unwrap(), 9);
///
/// heap.push(0);
/// assert_eq!(heap.pop_min().unwrap(), 0);
/// assert_eq!(heap.pop_max().unwrap(), 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MinMaxHeap<T: Ord> {
    heap: Vec<T>,
}

impl<T: Ord> MinMaxHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> MinMaxHeap<T> {
        MinMaxHeap { heap: Vec::new() }
    }

    /// Builds a heap from arbitrary items in O(N) by repairing every index
    /// from the last to the first.
    pub fn from_vec(items: Vec<T>) -> MinMaxHeap<T> {
        let mut heap = MinMaxHeap { heap: items };
        for i in (0..heap.heap.len()).rev() {
            heap.sift_down(i);
        }
        heap
    }

    /// Returns the number of items held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when the heap holds no items.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the minimum item.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyStructure`] when the heap is empty.
    pub fn peek_min(&self) -> SpatialResult<&T> {
        self.heap
            .first()
            .ok_or_else(|| SpatialError::EmptyStructure("cannot peek min of an empty heap".to_string()))
    }

    /// Returns the maximum item.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyStructure`] when the heap is empty.
    pub fn peek_max(&self) -> SpatialResult<&T> {
        if self.heap.is_empty() {
            return Err(SpatialError::EmptyStructure(
                "cannot peek max of an empty heap".to_string(),
            ));
        }
        Ok(&self.heap[self.max_index()])
    }

    /// Adds an item as the final leaf and repairs upward.
    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the minimum item.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyStructure`] when the heap is empty.
    pub fn pop_min(&mut self) -> SpatialResult<T> {
        if self.heap.is_empty() {
            return Err(SpatialError::EmptyStructure(
                "cannot pop min of an empty heap".to_string(),
            ));
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Removes and returns the maximum item.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyStructure`] when the heap is empty.
    pub fn pop_max(&mut self) -> SpatialResult<T> {
        if self.heap.is_empty() {
            return Err(SpatialError::EmptyStructure(
                "cannot pop max of an empty heap".to_string(),
            ));
        }
        let max_index = self.max_index();
        let max = self.heap.swap_remove(max_index);
        if max_index < self.heap.len() {
            self.sift_down(max_index);
        }
        Ok(max)
    }

    /// Index of the maximum: the root for a single item, otherwise the larger
    /// of the root's children.
    fn max_index(&self) -> usize {
        match self.heap.len() {
            0 | 1 => 0,
            2 => 1,
            _ => {
                if self.heap[1] >= self.heap[2] {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Whether the item at `a` precedes the item at `b` in the direction of
    /// the level being repaired (smaller-first on min levels, larger-first
    /// on max levels).
    fn precedes(&self, a: usize, b: usize, min_level: bool) -> bool {
        if min_level {
            self.heap[a] < self.heap[b]
        } else {
            self.heap[a] > self.heap[b]
        }
    }

    fn child_and_grandchild_indices(&self, i: usize) -> Vec<usize> {
        let len = self.heap.len();
        let mut indices = Vec::with_capacity(6);
        for child in [2 * i + 1, 2 * i + 2] {
            if child < len {
                indices.push(child);
            }
        }
        for child in [2 * i + 1, 2 * i + 2] {
            for grandchild in [2 * child + 1, 2 * child + 2] {
                if grandchild < len {
                    indices.push(grandchild);
                }
            }
        }
        indices
    }

    /// Repairs downward from `i` after its value may have shrunk or grown.
    ///
    /// The extreme among children and grandchildren is compared against `i`
    /// under the level's own rule. A violating grandchild is swapped in, the
    /// grandchild's former parent is re-checked under its opposite rule, and
    /// repair continues from the grandchild's old slot. A violating direct
    /// child is a single swap.
    fn sift_down(&mut self, mut i: usize) {
        loop {
            let min_level = is_min_level(i);
            let candidates = self.child_and_grandchild_indices(i);
            let extreme = candidates
                .into_iter()
                .reduce(|best, idx| if self.precedes(idx, best, min_level) { idx } else { best });
            let Some(m) = extreme else {
                return;
            };

            if is_grandchild(i, m) {
                if self.precedes(m, i, min_level) {
                    self.heap.swap(i, m);
                    let p = parent(m);
                    if self.precedes(p, m, min_level) {
                        self.heap.swap(m, p);
                    }
                    i = m;
                    continue;
                }
                return;
            }

            if self.precedes(m, i, min_level) {
                self.heap.swap(i, m);
            }
            return;
        }
    }

    /// Repairs upward from `i` after insertion at the final leaf.
    ///
    /// The parent sits on the opposite kind of level, the grandparent on the
    /// same kind; a violation against either is fixed by swapping and
    /// continuing from the swapped-to index.
    fn sift_up(&mut self, mut i: usize) {
        loop {
            if i == 0 {
                return;
            }
            let min_level = is_min_level(i);
            let p = parent(i);
            if self.precedes(p, i, min_level) {
                self.heap.swap(i, p);
                i = p;
                continue;
            }
            // Indices below 3 have no grandparent.
            if i < 3 {
                return;
            }
            let gp = parent(p);
            if self.precedes(i, gp, min_level) {
                self.heap.swap(i, gp);
                i = gp;
                continue;
            }
            return;
        }
    }
}
