//! Initial particle layouts
//!
//! Two distributions over the `[-1, 1]³` volume:
//!
//! - **Regular**: horizontal layers spaced `gap` apart in y. Within a layer
//!   the x/z grid spacing grows as `gap * 2^(2|y|)`, so layers near the top
//!   and bottom are sparser. The grid is built in the positive quadrant and
//!   mirrored into the other three, and every particle gets a small jitter.
//! - **Random**: x and z uniform on a 0.01 grid, y concentrated around the
//!   middle plane (`±0.5 * r³`).
//!
//! Particles keep their unjittered grid position as the spring origin.

use glam::DVec3;
use rand::Rng;

use crate::particle::Particle;

/// Jitter strength relative to the local grid spacing
const JITTER: f64 = 0.2;

/// Generate a layered grid of particles
///
/// # Example
///
/// ```
/// use voronoi_shards::generation::regular_particles;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let particles = regular_particles(0.1, &mut rng);
/// assert!(!particles.is_empty());
/// ```
pub fn regular_particles<R: Rng + ?Sized>(gap: f64, rng: &mut R) -> Vec<Particle> {
    let mut particles = Vec::new();
    if !(gap > 0.0 && gap.is_finite()) {
        return particles;
    }

    let mut y = -1.0;
    while y <= 1.0 {
        let xz_gap = gap * 2f64.powf(2.0 * f64::abs(y));

        let mut x = 0.0;
        while x <= 1.0 {
            let mut z = 0.0;
            while z <= 1.0 {
                particles.push(jittered(DVec3::new(x, y, z), xz_gap, rng));
                if x != 0.0 && z != 0.0 {
                    particles.push(jittered(DVec3::new(-x, y, z), xz_gap, rng));
                    particles.push(jittered(DVec3::new(-x, y, -z), xz_gap, rng));
                    particles.push(jittered(DVec3::new(x, y, -z), xz_gap, rng));
                }
                z += xz_gap;
            }
            x += xz_gap;
        }
        y += gap;
    }

    particles
}

/// Generate `count` particles concentrated around the `y = 0` plane
pub fn random_particles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let x = grid_value(rng);
            let z = grid_value(rng);
            let mut y = rng.gen::<f64>().powi(3);
            if rng.gen::<f64>() < 0.5 {
                y = -y;
            }
            Particle::new(DVec3::new(x, 0.5 * y, z))
        })
        .collect()
}

fn jittered<R: Rng + ?Sized>(origin: DVec3, xz_gap: f64, rng: &mut R) -> Particle {
    let offset = DVec3::new(
        JITTER * xz_gap * (rng.gen::<f64>() - 0.5),
        JITTER * (rng.gen::<f64>() - 0.5),
        JITTER * (rng.gen::<f64>() - 0.5),
    );
    Particle::displaced(origin, origin + offset)
}

/// Uniform in `[-1, 1)`, rounded to two decimals
fn grid_value<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let value: f64 = rng.gen_range(-1.0..1.0);
    (value * 100.0).round() / 100.0
}
