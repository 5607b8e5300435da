//! Drifting particles that seed the Voronoi sites
//!
//! Each particle wanders randomly around the position it was created at and
//! is pulled back by a steep spring. A [`VolumeTester`] keeps it inside the
//! region: a step that would leave the region is undone.

use glam::DVec3;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::region::VolumeTester;

/// Tuning for [`Particle::update`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Amplitude of the per-axis random velocity kick
    pub random_gain: f64,
    /// Exponent of the distance in the return spring
    pub spring_exponent: i32,
    /// Velocity multiplier applied while moving
    pub damping: f64,
    /// Speed below which damping is skipped
    pub damping_threshold: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            random_gain: 1e-4,
            spring_exponent: 6,
            damping: 0.999,
            damping_threshold: 1e-4,
        }
    }
}

/// A moving Voronoi site
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position
    pub position: DVec3,
    /// Rest position the spring pulls toward
    pub origin: DVec3,
    /// Displacement applied on the next update
    pub velocity: DVec3,
}

impl Particle {
    /// A particle at rest at `position`
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            origin: position,
            velocity: DVec3::ZERO,
        }
    }

    /// A particle at rest around `origin` but currently at `position`
    pub fn displaced(origin: DVec3, position: DVec3) -> Self {
        Self {
            position,
            origin,
            velocity: DVec3::ZERO,
        }
    }

    /// Advance one step
    ///
    /// Applies the current velocity, reverting it and stopping the particle
    /// if the tester rejects the new position. Then adds a random kick, the
    /// spring pull toward `origin` and damping.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        tester: Option<&VolumeTester>,
        params: &MotionParams,
        rng: &mut R,
    ) {
        self.position += self.velocity;
        if let Some(tester) = tester {
            if !tester.is_inside(self.position) {
                self.position -= self.velocity;
                self.velocity = DVec3::ZERO;
            }
        }

        let kick = DVec3::new(
            rng.gen::<f64>() - 0.5,
            rng.gen::<f64>() - 0.5,
            rng.gen::<f64>() - 0.5,
        );
        self.velocity += kick * params.random_gain;

        let offset = self.position - self.origin;
        let pull = offset.length().powi(params.spring_exponent);
        self.velocity -= offset.normalize_or_zero() * pull;

        if self.velocity.length() > params.damping_threshold {
            self.velocity *= params.damping;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Plane;
    use crate::region::BoundedRegion;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_particle_stays_near_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = MotionParams::default();
        let mut particle = Particle::new(DVec3::new(0.1, 0.2, 0.3));

        for _ in 0..5000 {
            particle.update(None, &params, &mut rng);
        }
        assert!(particle.position.distance(particle.origin) < 1.0);
        assert!(particle.velocity.is_finite());
    }

    #[test]
    fn test_rejected_step_is_reverted() {
        let region = BoundedRegion::cube(1.0).with_wall(Plane::new(DVec3::X, 0.5).unwrap());
        let tester = VolumeTester::new(&region);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let params = MotionParams {
            random_gain: 0.0,
            ..MotionParams::default()
        };

        let mut particle = Particle::new(DVec3::new(0.45, 0.0, 0.0));
        particle.velocity = DVec3::new(0.1, 0.0, 0.0);
        particle.update(Some(&tester), &params, &mut rng);

        assert_eq!(particle.position, DVec3::new(0.45, 0.0, 0.0));
        assert_eq!(particle.velocity, DVec3::ZERO);
    }

    #[test]
    fn test_spring_pulls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = MotionParams {
            random_gain: 0.0,
            ..MotionParams::default()
        };
        let mut particle = Particle::displaced(DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0));
        particle.update(None, &params, &mut rng);

        assert!(particle.velocity.x < 0.0);
        assert_eq!(particle.velocity.y, 0.0);
    }

    #[test]
    fn test_particle_at_origin_has_no_pull() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let params = MotionParams {
            random_gain: 0.0,
            ..MotionParams::default()
        };
        let mut particle = Particle::new(DVec3::ZERO);
        particle.update(None, &params, &mut rng);
        assert_eq!(particle.velocity, DVec3::ZERO);
    }
}
