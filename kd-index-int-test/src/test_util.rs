//! Shared helpers for integration and stress tests.

use kd_index::Point;
use rand::Rng;

/// Generates a random point with coordinates drawn uniformly from
/// `[min, max)`.
pub fn random_point<R: Rng>(rng: &mut R, dimensions: usize, min: f64, max: f64) -> Point {
    Point::new((0..dimensions).map(|_| rng.gen_range(min..max)).collect())
}

/// Generates a cloud of random points.
pub fn random_points<R: Rng>(
    rng: &mut R,
    count: usize,
    dimensions: usize,
    min: f64,
    max: f64,
) -> Vec<Point> {
    (0..count)
        .map(|_| random_point(rng, dimensions, min, max))
        .collect()
}

/// Generates points whose coordinates are drawn from a small value pool,
/// forcing many duplicate values along every axis.
pub fn grid_points<R: Rng>(
    rng: &mut R,
    count: usize,
    dimensions: usize,
    values: &[f64],
) -> Vec<Point> {
    (0..count)
        .map(|_| {
            Point::new(
                (0..dimensions)
                    .map(|_| values[rng.gen_range(0..values.len())])
                    .collect(),
            )
        })
        .collect()
}

/// O(N log N) reference answer: the `k` points closest to `target`,
/// nearest first.
pub fn brute_force_k_nearest(points: &[Point], target: &Point, k: usize) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.distance(target).total_cmp(&b.distance(target)));
    sorted.truncate(k.min(points.len()));
    sorted
}
