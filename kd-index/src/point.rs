use std::hash::Hash;
use std::ops::Index;

/// A point in D-dimensional space, represented by `f64` coordinates.
///
/// `Point` is the value type stored by [`KdTree`](crate::KdTree). The number
/// of coordinates is fixed at construction and a point is never mutated once
/// it has been inserted into a tree. Two points are equal when every
/// coordinate compares bitwise-equal under `f64` equality.
///
/// # Examples
///
/// ```rust
/// use kd_index::Point;
///
/// let p = Point::new(vec![2.0, 3.0]);
/// assert_eq!(p.dimensions(), 2);
/// assert_eq!(p[0], 2.0);
///
/// let q = Point::from([5.0, 7.0]);
/// assert!((p.distance(&q) - 5.0).abs() < 1e-12);
/// ```
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Point {
    coords: Vec<f64>,
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for coord in &self.coords {
            coord.to_bits().hash(state);
        }
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Point {
        Point::new(coords)
    }
}

impl<const D: usize> From<[f64; D]> for Point {
    fn from(coords: [f64; D]) -> Point {
        Point::new(coords.to_vec())
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point(")?;
        for (i, coord) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coord)?;
        }
        write!(f, ")")
    }
}

impl Point {
    /// Creates a new point from its coordinates.
    pub fn new(coords: Vec<f64>) -> Point {
        Point { coords }
    }

    /// Returns the number of coordinates.
    pub fn dimensions(&self) -> usize {
        self.coords.len()
    }

    /// Returns the coordinate along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `axis` is out of range.
    pub fn coord(&self, axis: usize) -> f64 {
        self.coords[axis]
    }

    /// Returns all coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Returns the Euclidean distance to another point.
    ///
    /// Both points must have the same number of dimensions; the tree
    /// validates this at its boundary before any distance is computed.
    pub fn distance(&self, other: &Point) -> f64 {
        debug_assert_eq!(self.coords.len(), other.coords.len());
        let sum: f64 = self
            .coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        sum.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new() {
        let p = Point::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.dimensions(), 3);
        assert_eq!(p.coord(0), 1.0);
        assert_eq!(p.coord(1), 2.0);
        assert_eq!(p.coord(2), 3.0);
    }

    #[test]
    fn test_equality() {
        let p1 = Point::new(vec![1.0, 2.0]);
        let p2 = Point::new(vec![1.0, 2.0]);
        let p3 = Point::new(vec![1.0, 2.5]);

        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
    }

    #[test]
    fn test_different_dimensions_not_equal() {
        let p1 = Point::new(vec![1.0, 2.0]);
        let p2 = Point::new(vec![1.0, 2.0, 0.0]);
        assert_ne!(p1, p2);
    }

    #[test]
    fn test_hash() {
        let p1 = Point::new(vec![1.0, 2.0]);
        let p2 = Point::new(vec![1.0, 2.0]);
        let p3 = Point::new(vec![3.0, 4.0]);

        let mut set = HashSet::new();
        set.insert(p1.clone());

        assert!(set.contains(&p2));
        assert!(!set.contains(&p3));
    }

    #[test]
    fn test_index() {
        let p = Point::new(vec![5.0, 7.0]);
        assert_eq!(p[0], 5.0);
        assert_eq!(p[1], 7.0);
    }

    #[test]
    fn test_from_array_and_vec() {
        let p1 = Point::from([2.0, 3.0]);
        let p2 = Point::from(vec![2.0, 3.0]);
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_distance() {
        let p1 = Point::new(vec![0.0, 0.0]);
        let p2 = Point::new(vec![3.0, 4.0]);
        assert_eq!(p1.distance(&p2), 5.0);
        assert_eq!(p2.distance(&p1), 5.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Point::new(vec![1.5, -2.5, 3.5]);
        assert_eq!(p.distance(&p), 0.0);
    }

    #[test]
    fn test_distance_negative_coordinates() {
        let p1 = Point::new(vec![-1.0, -1.0]);
        let p2 = Point::new(vec![2.0, 3.0]);
        assert_eq!(p1.distance(&p2), 5.0);
    }

    #[test]
    fn test_display() {
        let p = Point::new(vec![1.0, 2.5]);
        assert_eq!(format!("{}", p), "Point(1, 2.5)");
    }
}
