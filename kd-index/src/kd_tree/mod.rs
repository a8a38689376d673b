//! Balanced k-d tree over fixed-length points.
//!
//! The tree partitions space with one splitting hyperplane per node, cycling
//! through the coordinate axes by depth. It supports:
//! - Balanced bulk construction via median-of-selection (height O(log N))
//! - Point insertion, membership tests, and deletion with asymmetric repair
//! - Pruning nearest-neighbor and bounded k-nearest-neighbor search

mod node;
mod tree_impl;

pub use tree_impl::KdTree;
