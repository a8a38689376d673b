//! Node type and subtree-local recursion for the k-d tree.

use crate::point::Point;

/// A tree node owning one point and its optional children.
///
/// There are no parent back-references: every traversal runs root-to-leaf,
/// and deletion repair returns a (possibly new) subtree root that the caller
/// reattaches into its own child slot.
#[derive(Debug)]
pub(crate) struct KdNode {
    pub(crate) point: Point,
    pub(crate) left: Option<Box<KdNode>>,
    pub(crate) right: Option<Box<KdNode>>,
}

impl KdNode {
    pub(crate) fn new(point: Point) -> KdNode {
        KdNode {
            point,
            left: None,
            right: None,
        }
    }

    /// Finds the point with the minimum coordinate along `dim` in this
    /// subtree.
    ///
    /// When the level's own cutting axis equals `dim`, the minimum can only
    /// be this node or something in its left subtree (everything to the
    /// right is not smaller along `dim`), so only the left child is
    /// searched. On any other level both children can hold the minimum, so
    /// three candidates are compared.
    pub(crate) fn min_in_dimension(&self, dim: usize, depth: usize, dimensions: usize) -> &Point {
        let axis = depth % dimensions;
        if axis == dim {
            match self.left.as_deref() {
                Some(left) => {
                    let candidate = left.min_in_dimension(dim, depth + 1, dimensions);
                    if candidate.coord(dim) < self.point.coord(dim) {
                        candidate
                    } else {
                        &self.point
                    }
                }
                None => &self.point,
            }
        } else {
            let mut best = &self.point;
            if let Some(left) = self.left.as_deref() {
                let candidate = left.min_in_dimension(dim, depth + 1, dimensions);
                if candidate.coord(dim) < best.coord(dim) {
                    best = candidate;
                }
            }
            if let Some(right) = self.right.as_deref() {
                let candidate = right.min_in_dimension(dim, depth + 1, dimensions);
                if candidate.coord(dim) < best.coord(dim) {
                    best = candidate;
                }
            }
            best
        }
    }

    /// Number of nodes in this subtree.
    pub(crate) fn count(&self) -> usize {
        1 + self.left.as_deref().map_or(0, KdNode::count)
            + self.right.as_deref().map_or(0, KdNode::count)
    }

    /// Height of this subtree (a single node has height 1).
    pub(crate) fn height(&self) -> usize {
        let left = self.left.as_deref().map_or(0, KdNode::height);
        let right = self.right.as_deref().map_or(0, KdNode::height);
        1 + left.max(right)
    }

    /// Whether every point in this subtree satisfies `coord(axis) < bound`
    /// (when `strictly_less`) or `coord(axis) >= bound` (otherwise).
    fn all_satisfy(&self, axis: usize, bound: f64, strictly_less: bool) -> bool {
        let own = if strictly_less {
            self.point.coord(axis) < bound
        } else {
            self.point.coord(axis) >= bound
        };
        own && self
            .left
            .as_deref()
            .map_or(true, |left| left.all_satisfy(axis, bound, strictly_less))
            && self
                .right
                .as_deref()
                .map_or(true, |right| right.all_satisfy(axis, bound, strictly_less))
    }

    /// Checks the cutting-dimension invariant for this subtree: at depth `d`
    /// with axis `d mod D`, all left-subtree points are strictly smaller
    /// than this node along the axis and all right-subtree points are
    /// greater-or-equal.
    pub(crate) fn invariant_holds(&self, depth: usize, dimensions: usize) -> bool {
        let axis = depth % dimensions;
        let bound = self.point.coord(axis);
        if let Some(left) = self.left.as_deref() {
            if !left.all_satisfy(axis, bound, true) || !left.invariant_holds(depth + 1, dimensions)
            {
                return false;
            }
        }
        if let Some(right) = self.right.as_deref() {
            if !right.all_satisfy(axis, bound, false)
                || !right.invariant_holds(depth + 1, dimensions)
            {
                return false;
            }
        }
        true
    }
}
