//! Deterministic site sets

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voronoi_shards::{DVec3, Site, VolumeTester};

/// Uniform sites in `[-1, 1)³`
pub fn random_sites(count: usize, seed: u64) -> Vec<Site> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|id| Site::new(id, random_point(&mut rng)))
        .collect()
}

/// Uniform sites accepted by `tester`, numbered consecutively
pub fn sites_inside(tester: &VolumeTester, count: usize, seed: u64) -> Vec<Site> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sites = Vec::with_capacity(count);
    while sites.len() < count {
        let p = random_point(&mut rng);
        if tester.is_inside(p) {
            sites.push(Site::new(sites.len(), p));
        }
    }
    sites
}

/// Uniform point in `[-1, 1)³`
pub fn random_point<R: Rng>(rng: &mut R) -> DVec3 {
    DVec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
}
