use kd_index::{KdTree, SpatialResult};
use kd_index_int_test::test_util::{random_point, random_points};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> SpatialResult<()> {
    colog::init();
    println!("Starting stress test...");

    let mut rng = StdRng::seed_from_u64(20150516);
    let count = 100_000;
    let dimensions = 3;
    let points = random_points(&mut rng, count, dimensions, -1000.0, 1000.0);

    let start = std::time::Instant::now();
    let mut tree = KdTree::bulk_load(dimensions, points.clone())?;
    println!("Bulk loaded {} points in {:?}", count, start.elapsed());
    println!("Tree height: {}", tree.height());

    let start = std::time::Instant::now();
    let queries = 1_000;
    for _ in 0..queries {
        let target = random_point(&mut rng, dimensions, -1000.0, 1000.0);
        tree.k_nearest_neighbors(&target, 10)?;
    }
    println!("Ran {} k=10 queries in {:?}", queries, start.elapsed());

    let start = std::time::Instant::now();
    for point in points.iter().take(count / 2) {
        tree.remove(point)?;
    }
    println!(
        "Removed {} points in {:?}",
        count / 2,
        start.elapsed()
    );

    assert!(tree.verify_integrity());
    println!("Integrity verified, {} points remain", tree.size());
    Ok(())
}
