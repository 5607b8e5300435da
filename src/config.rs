//! Shard scene configuration and builder
//!
//! This module provides the settings that drive a [`ShardScene`](crate::ShardScene):
//! the region, how particles are laid out and moved, and the heave animation.

use glam::DVec3;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShardError};
use crate::generation::{random_particles, regular_particles};
use crate::geometry::Plane;
use crate::particle::{MotionParams, Particle};
use crate::region::{tetra_walls, BoundedRegion};
use crate::shard::HeaveParams;

/// Walls added to the region box
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallPreset {
    /// Box only
    None,
    /// Eight slanted walls forming a double pyramid (default)
    #[default]
    Tetra,
}

impl WallPreset {
    /// The wall planes for this preset
    pub fn walls(self) -> Vec<Plane> {
        match self {
            WallPreset::None => Vec::new(),
            WallPreset::Tetra => tetra_walls(),
        }
    }
}

/// How the initial particles are placed
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleLayout {
    /// Layered grid, sparser toward the top and bottom
    Regular {
        /// Layer spacing
        gap: f64,
    },
    /// Random positions concentrated around the middle plane
    Random {
        /// Number of particles
        count: usize,
    },
}

impl ParticleLayout {
    /// Generate particles for this layout
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<Particle> {
        match self {
            ParticleLayout::Regular { gap } => regular_particles(gap, rng),
            ParticleLayout::Random { count } => random_particles(count, rng),
        }
    }
}

impl Default for ParticleLayout {
    fn default() -> Self {
        ParticleLayout::Regular { gap: 0.1 }
    }
}

/// Configuration for a shard scene
///
/// The same configuration (including the seed) always produces the same
/// particles, colors and frames for the same sequence of update times.
///
/// # Example
///
/// ```rust
/// use voronoi_shards::*;
///
/// let config = SceneConfigBuilder::new()
///     .seed(42)
///     .layout(ParticleLayout::Random { count: 50 })
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: SceneConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Random seed for particles, motion and palette order
    pub seed: u64,
    /// Lower corner of the region box
    pub bounds_min: DVec3,
    /// Upper corner of the region box
    pub bounds_max: DVec3,
    /// Walls clipping the box
    pub walls: WallPreset,
    /// Initial particle placement
    pub layout: ParticleLayout,
    /// Inset distance at full inset heave
    pub inset_by: f64,
    /// Angular speed of the inset heave, per millisecond
    pub inset_heave_speed: f64,
    /// Shard displacement at full displacement heave
    pub displace_by: f64,
    /// Angular speed of the displacement heave, per millisecond
    pub displace_heave_speed: f64,
    /// Scene rotation about y, radians per millisecond
    pub rot_speed: f64,
    /// Cells with less volume are not turned into shards
    pub min_cell_volume: f64,
    /// Shard displacement geometry
    pub heave: HeaveParams,
    /// Particle motion tuning
    pub motion: MotionParams,
    /// Negate z when exporting meshes
    pub mirror_z: bool,
}

impl SceneConfig {
    /// The bounded region described by this configuration
    pub fn region(&self) -> BoundedRegion {
        BoundedRegion::new(self.bounds_min, self.bounds_max).with_walls(self.walls.walls())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfigBuilder::new().into_config(rand::random())
    }
}

/// Builder for creating SceneConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_shards::*;
///
/// // Use defaults
/// let config = SceneConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = SceneConfigBuilder::new()
///     .seed(12345)
///     .walls(WallPreset::None)
///     .inset_by(0.02)
///     .unwrap()
///     .displace_by(1.5)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 12345);
/// ```
#[derive(Debug, Clone)]
pub struct SceneConfigBuilder {
    seed: Option<u64>,
    bounds_min: DVec3,
    bounds_max: DVec3,
    walls: WallPreset,
    layout: ParticleLayout,
    inset_by: f64,
    inset_heave_speed: f64,
    displace_by: f64,
    displace_heave_speed: f64,
    rot_speed: f64,
    min_cell_volume: f64,
    heave: HeaveParams,
    motion: MotionParams,
    mirror_z: bool,
}

impl SceneConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - bounds: `[-1, 1]` on every axis
    /// - walls: Tetra
    /// - layout: Regular grid with gap 0.1
    /// - inset_by: 0.01, inset_heave_speed: 0.0009
    /// - displace_by: 3.0, displace_heave_speed: 0.0007
    /// - rot_speed: 0.0001
    /// - min_cell_volume: 5e-6
    /// - mirror_z: true
    pub fn new() -> Self {
        Self {
            seed: None,
            bounds_min: DVec3::splat(-1.0),
            bounds_max: DVec3::splat(1.0),
            walls: WallPreset::default(),
            layout: ParticleLayout::default(),
            inset_by: 0.01,
            inset_heave_speed: 0.0009,
            displace_by: 3.0,
            displace_heave_speed: 0.0007,
            rot_speed: 0.0001,
            min_cell_volume: 5e-6,
            heave: HeaveParams::default(),
            motion: MotionParams::default(),
            mirror_z: true,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the region box
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a coordinate is not finite or `min` is not
    /// strictly below `max` on every axis
    pub fn bounds(mut self, min: DVec3, max: DVec3) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min.cmpge(max).any() {
            return Err(ShardError::InvalidConfig(format!(
                "region bounds must satisfy min < max on every axis (got {} .. {})",
                min, max
            )));
        }
        self.bounds_min = min;
        self.bounds_max = max;
        Ok(self)
    }

    /// Set the wall preset
    pub fn walls(mut self, walls: WallPreset) -> Self {
        self.walls = walls;
        self
    }

    /// Set the particle layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a regular gap is not positive and finite
    pub fn layout(mut self, layout: ParticleLayout) -> Result<Self> {
        if let ParticleLayout::Regular { gap } = layout {
            if !(gap > 0.0 && gap.is_finite()) {
                return Err(ShardError::InvalidConfig(format!(
                    "particle gap must be positive (got {})",
                    gap
                )));
            }
        }
        self.layout = layout;
        Ok(self)
    }

    /// Set the inset distance at full heave
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is negative or not finite
    pub fn inset_by(mut self, inset_by: f64) -> Result<Self> {
        self.inset_by = non_negative("inset_by", inset_by)?;
        Ok(self)
    }

    /// Set the inset heave speed
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is not finite
    pub fn inset_heave_speed(mut self, speed: f64) -> Result<Self> {
        self.inset_heave_speed = finite("inset_heave_speed", speed)?;
        Ok(self)
    }

    /// Set the shard displacement at full heave
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is negative or not finite
    pub fn displace_by(mut self, displace_by: f64) -> Result<Self> {
        self.displace_by = non_negative("displace_by", displace_by)?;
        Ok(self)
    }

    /// Set the displacement heave speed
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is not finite
    pub fn displace_heave_speed(mut self, speed: f64) -> Result<Self> {
        self.displace_heave_speed = finite("displace_heave_speed", speed)?;
        Ok(self)
    }

    /// Set the scene rotation speed
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is not finite
    pub fn rot_speed(mut self, speed: f64) -> Result<Self> {
        self.rot_speed = finite("rot_speed", speed)?;
        Ok(self)
    }

    /// Set the volume below which cells are culled
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is negative or not finite
    pub fn min_cell_volume(mut self, volume: f64) -> Result<Self> {
        self.min_cell_volume = non_negative("min_cell_volume", volume)?;
        Ok(self)
    }

    /// Set the shard displacement geometry
    pub fn heave(mut self, heave: HeaveParams) -> Self {
        self.heave = heave;
        self
    }

    /// Set the particle motion tuning
    pub fn motion(mut self, motion: MotionParams) -> Self {
        self.motion = motion;
        self
    }

    /// Whether to negate z when exporting meshes
    pub fn mirror_z(mut self, mirror_z: bool) -> Self {
        self.mirror_z = mirror_z;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is generated.
    pub fn build(self) -> Result<SceneConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(self.into_config(seed))
    }

    fn into_config(self, seed: u64) -> SceneConfig {
        SceneConfig {
            seed,
            bounds_min: self.bounds_min,
            bounds_max: self.bounds_max,
            walls: self.walls,
            layout: self.layout,
            inset_by: self.inset_by,
            inset_heave_speed: self.inset_heave_speed,
            displace_by: self.displace_by,
            displace_heave_speed: self.displace_heave_speed,
            rot_speed: self.rot_speed,
            min_cell_volume: self.min_cell_volume,
            heave: self.heave,
            motion: self.motion,
            mirror_z: self.mirror_z,
        }
    }
}

impl Default for SceneConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ShardError::InvalidConfig(format!(
            "{} must be finite (got {})",
            name, value
        )));
    }
    Ok(value)
}

fn non_negative(name: &str, value: f64) -> Result<f64> {
    if finite(name, value)? < 0.0 {
        return Err(ShardError::InvalidConfig(format!(
            "{} must be >= 0 (got {})",
            name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SceneConfigBuilder::new().build().unwrap();
        assert_eq!(config.walls, WallPreset::Tetra);
        assert_eq!(config.layout, ParticleLayout::Regular { gap: 0.1 });
        assert_eq!(config.inset_by, 0.01);
        assert_eq!(config.displace_by, 3.0);
        assert_eq!(config.min_cell_volume, 5e-6);
        assert!(config.mirror_z);
        assert_eq!(config.heave, HeaveParams::default());
    }

    #[test]
    fn test_builder_custom() {
        let config = SceneConfigBuilder::new()
            .seed(42)
            .walls(WallPreset::None)
            .layout(ParticleLayout::Random { count: 10 })
            .unwrap()
            .bounds(DVec3::splat(-2.0), DVec3::splat(2.0))
            .unwrap()
            .mirror_z(false)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.layout, ParticleLayout::Random { count: 10 });
        assert!(!config.mirror_z);
        let region = config.region();
        assert!(region.walls.is_empty());
        assert!((region.volume() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_builder_validation() {
        assert!(SceneConfigBuilder::new().inset_by(-0.1).is_err());
        assert!(SceneConfigBuilder::new().displace_by(f64::NAN).is_err());
        assert!(SceneConfigBuilder::new().rot_speed(f64::INFINITY).is_err());
        assert!(SceneConfigBuilder::new().min_cell_volume(-1.0).is_err());
        assert!(SceneConfigBuilder::new()
            .layout(ParticleLayout::Regular { gap: 0.0 })
            .is_err());
        assert!(SceneConfigBuilder::new()
            .bounds(DVec3::ONE, DVec3::ZERO)
            .is_err());
        assert!(SceneConfigBuilder::new()
            .bounds(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_tetra_region() {
        let config = SceneConfigBuilder::new().seed(1).build().unwrap();
        let region = config.region();
        assert_eq!(region.walls.len(), 8);
        assert!(region.volume() < 8.0);
    }

    #[test]
    fn test_layout_generates() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        assert_eq!(ParticleLayout::Random { count: 12 }.generate(&mut rng).len(), 12);
        assert!(!ParticleLayout::default().generate(&mut rng).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SceneConfigBuilder::new().seed(7).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: SceneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
