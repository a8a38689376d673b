//! KdTree implementation.

use rand::Rng;

use crate::bounded_priority_queue::BoundedPriorityQueue;
use crate::errors::{SpatialError, SpatialResult};
use crate::point::Point;
use crate::select;

use super::node::KdNode;

/// Best candidate found so far during single-nearest-neighbor search.
struct BestGuess<'a> {
    point: Option<&'a Point>,
    distance: f64,
}

/// A balanced binary space-partitioning tree over fixed-length points.
///
/// Every node at depth `d` splits space along the cutting axis
/// `c = d mod D`: points whose coordinate along `c` is strictly smaller than
/// the node's live in the left subtree, all others in the right subtree.
/// The invariant holds after every operation, which is what makes the
/// pruning searches correct.
///
/// The tree is single-threaded and in-memory; callers serialize concurrent
/// access.
///
/// # Examples
///
/// ```rust
/// use kd_index::{KdTree, Point};
///
/// let points = vec![
///     Point::from([2.0, 3.0]),
///     Point::from([5.0, 4.0]),
///     Point::from([9.0, 6.0]),
/// ];
/// let tree = KdTree::bulk_load(2, points).unwrap();
///
/// assert_eq!(tree.size(), 3);
/// assert!(tree.contains(&Point::from([5.0, 4.0])).unwrap());
///
/// let nearest = tree.nearest_neighbor(&Point::from([6.0, 4.0])).unwrap();
/// assert_eq!(nearest, Point::from([5.0, 4.0]));
/// ```
#[derive(Debug)]
pub struct KdTree {
    dimensions: usize,
    root: Option<Box<KdNode>>,
    size: usize,
}

impl KdTree {
    /// Creates an empty tree over `dimensions`-dimensional points.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] when `dimensions` is zero.
    pub fn new(dimensions: usize) -> SpatialResult<KdTree> {
        if dimensions == 0 {
            return Err(SpatialError::InvalidArgument(
                "tree dimensionality must be at least 1".to_string(),
            ));
        }
        Ok(KdTree {
            dimensions,
            root: None,
            size: 0,
        })
    }

    /// Builds a balanced tree from a point set.
    ///
    /// Each subtree is rooted at the point holding the median value along
    /// the current depth's cutting axis, found with order-statistic
    /// selection; the remaining points are partitioned into strictly-less
    /// and greater-or-equal halves and built recursively at depth + 1.
    ///
    /// # Performance
    ///
    /// - Time: O(N log N), linear selection per level across O(log N)
    ///   levels.
    /// - Height: O(log N) regardless of input order, unlike sequential
    ///   insertion.
    ///
    /// The input vector is consumed and partitioned in place.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] when `dimensions` is zero
    /// or any point's dimensionality differs from `dimensions`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kd_index::{KdTree, Point};
    ///
    /// let points: Vec<Point> = (0..100)
    ///     .map(|i| Point::from([i as f64, (i * 37 % 101) as f64]))
    ///     .collect();
    ///
    /// let tree = KdTree::bulk_load(2, points).unwrap();
    /// assert_eq!(tree.size(), 100);
    /// assert!(tree.height() <= 8);
    /// ```
    pub fn bulk_load(dimensions: usize, points: Vec<Point>) -> SpatialResult<KdTree> {
        let mut tree = KdTree::new(dimensions)?;
        for point in &points {
            tree.validate_dimensions(point)?;
        }
        log::debug!(
            "bulk loading {} points into a {}-dimensional k-d tree",
            points.len(),
            dimensions
        );

        let size = points.len();
        let mut points = points;
        let mut rng = rand::thread_rng();
        tree.root = Self::build_balanced(&mut points, 0, dimensions, &mut rng)?;
        tree.size = size;
        Ok(tree)
    }

    /// Returns the fixed dimensionality of the tree.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Returns the number of points held.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` when the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the height of the tree (an empty tree has height 0).
    pub fn height(&self) -> usize {
        self.root.as_deref().map_or(0, KdNode::height)
    }

    /// Inserts a point. Cost is proportional to the tree height.
    ///
    /// Duplicate points are allowed; a duplicate descends to the
    /// greater-or-equal side at every level.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] on a dimensionality
    /// mismatch.
    pub fn add(&mut self, point: Point) -> SpatialResult<()> {
        self.validate_dimensions(&point)?;
        match self.root.as_deref_mut() {
            Some(root) => Self::insert_below(root, point, 0, self.dimensions),
            None => self.root = Some(Box::new(KdNode::new(point))),
        }
        self.size += 1;
        Ok(())
    }

    /// Tests membership by full coordinate-wise equality.
    ///
    /// Equality is checked only along the single root-to-leaf path the
    /// invariant allows the point to be on.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] on a dimensionality
    /// mismatch.
    pub fn contains(&self, point: &Point) -> SpatialResult<bool> {
        self.validate_dimensions(point)?;
        Ok(Self::contains_below(
            self.root.as_deref(),
            point,
            0,
            self.dimensions,
        ))
    }

    /// Removes one occurrence of a point.
    ///
    /// The node holding the point is located by descent, then repaired:
    ///
    /// - With a right subtree: the stored point is replaced by the right
    ///   subtree's minimum along this node's cutting axis, and that
    ///   replacement is removed from the right subtree.
    /// - With only a left subtree: the replacement is the left subtree's
    ///   minimum along the cutting axis, the whole left subtree moves into
    ///   the right child slot, and the replacement is removed from the moved
    ///   subtree. Points that tie with the replacement along the axis end up
    ///   on the greater-or-equal side, where the invariant requires them; a
    ///   symmetric "promote the maximum from the left" would strand such
    ///   ties on the strictly-less side.
    /// - A leaf is spliced out entirely.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::NotFound`] when the point is absent. The
    /// lookup is a pure read, so a failed removal mutates nothing.
    pub fn remove(&mut self, point: &Point) -> SpatialResult<()> {
        self.validate_dimensions(point)?;
        if !Self::contains_below(self.root.as_deref(), point, 0, self.dimensions) {
            return Err(SpatialError::NotFound(format!(
                "point {} is not in the tree",
                point
            )));
        }
        let root = self.root.take();
        self.root = Self::remove_below(root, point, 0, self.dimensions);
        self.size -= 1;
        Ok(())
    }

    /// Returns the point closest to `target` by Euclidean distance.
    ///
    /// Branch-and-bound descent: the child on the target's side of the
    /// splitting hyperplane is searched first; the other child is searched
    /// only when the hyperplane is closer to the target than the best
    /// candidate found so far.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyStructure`] when the tree is empty, and
    /// [`SpatialError::InvalidArgument`] on a dimensionality mismatch.
    pub fn nearest_neighbor(&self, target: &Point) -> SpatialResult<Point> {
        self.validate_dimensions(target)?;
        let mut best = BestGuess {
            point: None,
            distance: f64::INFINITY,
        };
        Self::nearest_below(self.root.as_deref(), target, 0, self.dimensions, &mut best);
        match best.point {
            Some(point) => Ok(point.clone()),
            None => Err(SpatialError::EmptyStructure(
                "cannot find a nearest neighbor in an empty tree".to_string(),
            )),
        }
    }

    /// Returns the `k` points closest to `target`, nearest first.
    ///
    /// Candidates are collected in a [`BoundedPriorityQueue`] of capacity
    /// `k`; a subtree on the far side of a splitting hyperplane is visited
    /// only while the queue is not yet full or the hyperplane lies closer
    /// than the current k-th-best distance. When `k` exceeds the tree size,
    /// all points are returned.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] when `k` is zero or on a
    /// dimensionality mismatch.
    pub fn k_nearest_neighbors(&self, target: &Point, k: usize) -> SpatialResult<Vec<Point>> {
        self.validate_dimensions(target)?;
        if k == 0 {
            return Err(SpatialError::InvalidArgument(
                "k must be at least 1".to_string(),
            ));
        }
        let mut queue = BoundedPriorityQueue::new(k)?;
        Self::knn_below(self.root.as_deref(), target, 0, self.dimensions, &mut queue);
        Ok(queue.to_vec_by_priority().into_iter().cloned().collect())
    }

    /// Checks the structural invariant and the size counter over the whole
    /// tree. Intended for tests and debugging; cost is well above the
    /// per-operation bounds.
    pub fn verify_integrity(&self) -> bool {
        match self.root.as_deref() {
            Some(root) => {
                root.count() == self.size && root.invariant_holds(0, self.dimensions)
            }
            None => self.size == 0,
        }
    }

    // === Helpers ===

    fn validate_dimensions(&self, point: &Point) -> SpatialResult<()> {
        if point.dimensions() != self.dimensions {
            return Err(SpatialError::InvalidArgument(format!(
                "point has {} dimensions, the tree expects {}",
                point.dimensions(),
                self.dimensions
            )));
        }
        Ok(())
    }

    fn insert_below(node: &mut KdNode, point: Point, depth: usize, dimensions: usize) {
        let axis = depth % dimensions;
        if point.coord(axis) < node.point.coord(axis) {
            match node.left.as_deref_mut() {
                Some(left) => Self::insert_below(left, point, depth + 1, dimensions),
                None => node.left = Some(Box::new(KdNode::new(point))),
            }
        } else {
            match node.right.as_deref_mut() {
                Some(right) => Self::insert_below(right, point, depth + 1, dimensions),
                None => node.right = Some(Box::new(KdNode::new(point))),
            }
        }
    }

    fn contains_below(
        node: Option<&KdNode>,
        target: &Point,
        depth: usize,
        dimensions: usize,
    ) -> bool {
        let Some(node) = node else {
            return false;
        };
        if node.point == *target {
            return true;
        }
        let axis = depth % dimensions;
        let child = if target.coord(axis) < node.point.coord(axis) {
            node.left.as_deref()
        } else {
            node.right.as_deref()
        };
        Self::contains_below(child, target, depth + 1, dimensions)
    }

    /// Removes `target` from the subtree and returns the repaired subtree
    /// root. The caller guarantees the target is present.
    fn remove_below(
        node: Option<Box<KdNode>>,
        target: &Point,
        depth: usize,
        dimensions: usize,
    ) -> Option<Box<KdNode>> {
        let mut node = node?;
        let axis = depth % dimensions;

        if node.point == *target {
            if let Some(right) = node.right.take() {
                let replacement = right.min_in_dimension(axis, depth + 1, dimensions).clone();
                node.right = Self::remove_below(Some(right), &replacement, depth + 1, dimensions);
                node.point = replacement;
                return Some(node);
            }
            if let Some(left) = node.left.take() {
                // The left subtree becomes the right subtree: its points are
                // all >= the new split value along the axis, or get pulled
                // out as the replacement.
                let replacement = left.min_in_dimension(axis, depth + 1, dimensions).clone();
                node.right = Self::remove_below(Some(left), &replacement, depth + 1, dimensions);
                node.point = replacement;
                return Some(node);
            }
            return None;
        }

        if target.coord(axis) < node.point.coord(axis) {
            node.left = Self::remove_below(node.left.take(), target, depth + 1, dimensions);
        } else {
            node.right = Self::remove_below(node.right.take(), target, depth + 1, dimensions);
        }
        Some(node)
    }

    fn nearest_below<'a>(
        node: Option<&'a KdNode>,
        target: &Point,
        depth: usize,
        dimensions: usize,
        best: &mut BestGuess<'a>,
    ) {
        let Some(node) = node else {
            return;
        };
        let distance = node.point.distance(target);
        if distance < best.distance {
            best.point = Some(&node.point);
            best.distance = distance;
        }

        let axis = depth % dimensions;
        let diff = target.coord(axis) - node.point.coord(axis);
        let (near, far) = if diff < 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        Self::nearest_below(near, target, depth + 1, dimensions, best);
        // A closer point can only sit on the far side if the splitting
        // hyperplane is nearer than the best distance found so far.
        if diff.abs() < best.distance {
            Self::nearest_below(far, target, depth + 1, dimensions, best);
        }
    }

    fn knn_below<'a>(
        node: Option<&'a KdNode>,
        target: &Point,
        depth: usize,
        dimensions: usize,
        queue: &mut BoundedPriorityQueue<&'a Point>,
    ) {
        let Some(node) = node else {
            return;
        };
        queue.add(&node.point, node.point.distance(target));

        let axis = depth % dimensions;
        let diff = target.coord(axis) - node.point.coord(axis);
        let (near, far) = if diff < 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        Self::knn_below(near, target, depth + 1, dimensions, queue);
        let prune = queue.is_full()
            && queue
                .peek_max_priority()
                .map_or(false, |worst| diff.abs() >= worst);
        if !prune {
            Self::knn_below(far, target, depth + 1, dimensions, queue);
        }
    }

    fn build_balanced<R: Rng + ?Sized>(
        points: &mut [Point],
        depth: usize,
        dimensions: usize,
        rng: &mut R,
    ) -> SpatialResult<Option<Box<KdNode>>> {
        if points.is_empty() {
            return Ok(None);
        }
        let axis = depth % dimensions;
        let median_rank = points.len() / 2 + 1;
        let split = select::select_in_place_by_rng(
            points,
            median_rank,
            |a, b| a.coord(axis).total_cmp(&b.coord(axis)),
            rng,
        )?
        .coord(axis);

        // Selection leaves smaller-or-equal points in front of the median.
        // Points that tie with it along the axis belong on the
        // greater-or-equal side, so compact the strictly smaller ones to
        // the front and place the median just past them.
        let median_index = median_rank - 1;
        let mut less_len = 0;
        for i in 0..median_index {
            if points[i].coord(axis) < split {
                points.swap(i, less_len);
                less_len += 1;
            }
        }
        points.swap(less_len, median_index);

        let point = std::mem::take(&mut points[less_len]);
        let mut node = Box::new(KdNode::new(point));
        node.left = Self::build_balanced(&mut points[..less_len], depth + 1, dimensions, rng)?;
        node.right =
            Self::build_balanced(&mut points[less_len + 1..], depth + 1, dimensions, rng)?;
        Ok(Some(node))
    }
}
