//! Estimate the walled region's volume with the containment tester

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voronoi_shards::*;

fn main() {
    let region = BoundedRegion::cube(1.0).with_walls(tetra_walls());
    let tester = VolumeTester::new(&region);
    println!("Tester has {} walls", tester.wall_count());

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let samples = 200_000;
    let inside = (0..samples)
        .filter(|_| {
            tester.is_point_inside(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .count();

    let estimate = 8.0 * inside as f64 / samples as f64;
    println!("Monte Carlo volume: {:.4}", estimate);
    println!("Exact volume:       {:.4}", region.volume());

    for point in [DVec3::ZERO, DVec3::new(0.0, 0.9, 0.0), DVec3::new(0.5, 0.0, 0.0)] {
        println!("{:?} inside: {}", point, tester.is_inside(point));
    }
}
