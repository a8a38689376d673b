//! # kd-index - Multi-Dimensional Spatial Indexing
//!
//! This crate provides an in-memory spatial index: a balanced k-d tree over
//! fixed-length `f64` points, together with the two supporting structures
//! its queries depend on: a capacity-bounded dual-ended priority queue and
//! randomized order-statistic selection.
//!
//! ## Features
//!
//! - **Balanced Bulk Construction**: median-of-selection builds, height
//!   O(log N) regardless of input order
//! - **Mutation**: insertion and deletion that maintain the space-partition
//!   invariant across arbitrary operation sequences
//! - **Pruning Queries**: nearest-neighbor and k-nearest-neighbor search
//!   that skip subtrees provably unable to improve the result
//! - **Dual-Ended Heap**: O(1) min and max lookup backing the bounded queue
//! - **Order-Statistic Selection**: expected-O(N) rank queries, in-place or
//!   on a private copy
//!
//! ## Quick Start
//!
//! ```rust
//! use kd_index::{KdTree, Point};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = vec![
//!     Point::from([2.0, 3.0]),
//!     Point::from([5.0, 4.0]),
//!     Point::from([9.0, 6.0]),
//!     Point::from([4.0, 7.0]),
//!     Point::from([8.0, 1.0]),
//!     Point::from([7.0, 2.0]),
//! ];
//!
//! let mut tree = KdTree::bulk_load(2, points)?;
//!
//! let nearest = tree.nearest_neighbor(&Point::from([0.0, 0.0]))?;
//! assert_eq!(nearest, Point::from([2.0, 3.0]));
//!
//! let three_nearest = tree.k_nearest_neighbors(&Point::from([0.0, 0.0]), 3)?;
//! assert_eq!(three_nearest.len(), 3);
//!
//! tree.remove(&Point::from([7.0, 2.0]))?;
//! assert!(!tree.contains(&Point::from([7.0, 2.0]))?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Bounded Priority Queue
//!
//! ```rust
//! use kd_index::BoundedPriorityQueue;
//!
//! let mut queue = BoundedPriorityQueue::new(2).unwrap();
//! queue.add("a", 3.0);
//! queue.add("b", 1.0);
//!
//! // The queue is full; the worst entry is evicted and handed back.
//! assert_eq!(queue.add("c", 2.0), Some("a"));
//! assert_eq!(queue.to_vec_by_priority(), vec!["b", "c"]);
//! ```
//!
//! All structures are single-threaded and in-memory; callers serialize
//! concurrent access.

pub mod bounded_priority_queue;
pub mod errors;
pub mod kd_tree;
pub mod min_max_heap;
pub mod point;
pub mod select;

pub use bounded_priority_queue::BoundedPriorityQueue;
pub use errors::{SpatialError, SpatialResult};
pub use kd_tree::KdTree;
pub use min_max_heap::MinMaxHeap;
pub use point::Point;
pub use select::{select, select_by, select_in_place, select_in_place_by, select_in_place_by_rng};
