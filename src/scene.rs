//! ShardScene: the per-frame driver
//!
//! Owns the particles, the region and every reusable buffer. A frame is two
//! calls: [`ShardScene::update`] advances the animation clock and moves the
//! particles, [`ShardScene::build_frame`] tessellates the current positions and
//! refills the mesh pool.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::config::SceneConfig;
use crate::error::Result;
use crate::generation::{sites_from_particles, CellBuilder, Tessellation};
use crate::mesh::{ColorMapper, Hsl, MeshPool, PaletteColorMapper, ShardMesh};
use crate::particle::Particle;
use crate::region::{BoundedRegion, VolumeTester};
use crate::shard::Shard;

/// Slow oscillation between 0.1 and 1.0
///
/// `time` is in milliseconds and `speed` in radians per millisecond.
pub fn heave_wave(time: f64, speed: f64) -> f64 {
    0.1 + 0.45 * ((time * speed).sin() + 1.0)
}

/// Counts from one [`ShardScene::build_frame`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Particles that were inside the box and became sites
    pub sites: usize,
    /// Cells turned into shards
    pub cells: usize,
    /// Cells dropped for being too small
    pub culled: usize,
    /// Triangles written to the mesh pool
    pub triangles: usize,
}

/// An animated Voronoi shard scene
///
/// # Example
///
/// ```
/// use voronoi_shards::*;
///
/// let config = SceneConfigBuilder::new()
///     .seed(7)
///     .layout(ParticleLayout::Random { count: 40 })
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut scene = ShardScene::new(config);
/// scene.update(16.0);
/// let stats = scene.build_frame(0.0).unwrap();
/// assert_eq!(scene.meshes().count(), stats.cells);
/// ```
#[derive(Debug)]
pub struct ShardScene {
    config: SceneConfig,
    region: BoundedRegion,
    tester: VolumeTester,
    particles: Vec<Particle>,
    rng: ChaCha8Rng,
    builder: CellBuilder,
    colors: PaletteColorMapper,
    pool: MeshPool,
    triangles: Vec<DVec3>,
    y_rotation: f64,
    inset_heave: f64,
    displace_heave: f64,
}

impl ShardScene {
    /// Create a scene, generating particles and dealing colors from the seed
    pub fn new(config: SceneConfig) -> Self {
        let region = config.region();
        let tester = VolumeTester::new(&region);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let particles = config.layout.generate(&mut rng);

        let mut colors = PaletteColorMapper::default();
        colors.shuffle(&mut rng);

        info!(
            seed = config.seed,
            particles = particles.len(),
            walls = region.walls.len(),
            "shard scene created"
        );

        Self {
            pool: MeshPool::new(particles.len()),
            config,
            region,
            tester,
            particles,
            rng,
            builder: CellBuilder::new(),
            colors,
            triangles: Vec::new(),
            y_rotation: 0.0,
            inset_heave: 1.0,
            displace_heave: 0.0,
        }
    }

    /// Advance the animation clock to `time_ms` and move every particle
    pub fn update(&mut self, time_ms: f64) {
        self.y_rotation = time_ms * self.config.rot_speed;
        self.inset_heave = heave_wave(time_ms, self.config.inset_heave_speed);
        self.displace_heave = heave_wave(time_ms, self.config.displace_heave_speed);

        let tester = &self.tester;
        let motion = &self.config.motion;
        let rng = &mut self.rng;
        for particle in &mut self.particles {
            particle.update(Some(tester), motion, rng);
        }
    }

    /// Inset distance for the current heave
    pub fn inset_distance(&self) -> f64 {
        self.inset_heave * self.config.inset_by
    }

    /// Shard displacement for the current heave plus an external amount
    pub fn displacement(&self, extra: f64) -> f64 {
        self.displace_heave * self.config.displace_by + extra
    }

    /// Tessellate the current particle positions
    ///
    /// Particles that drifted out of the region box are left out.
    pub fn tessellate(&mut self) -> Result<Tessellation> {
        let sites = sites_from_particles(&self.particles, &self.region);
        let skipped = self.particles.len() - sites.len();
        if skipped > 0 {
            debug!(skipped, "particles outside the region box");
        }
        self.builder
            .build(&self.region, &sites, self.inset_distance())
    }

    /// Build shards for the current state and refill the mesh pool
    ///
    /// `extra_displacement` is added to the heave displacement, e.g. from an
    /// audio level.
    pub fn build_frame(&mut self, extra_displacement: f64) -> Result<FrameStats> {
        let tessellation = self.tessellate()?;
        let displacement = self.displacement(extra_displacement);

        self.pool.begin_frame();
        let mut stats = FrameStats {
            sites: tessellation.len(),
            ..FrameStats::default()
        };

        for (index, cell) in tessellation.cells.iter().enumerate() {
            if cell.volume < self.config.min_cell_volume {
                stats.culled += 1;
                continue;
            }
            let Some(shell) = tessellation.shell(index) else {
                continue;
            };
            let Some(slot) = self.pool.slot_mut(cell.id) else {
                continue;
            };

            let shard = Shard::new(shell, displacement, &self.config.heave);
            self.triangles.clear();
            shard.append_triangles(&mut self.triangles);

            slot.fill(
                &self.triangles,
                self.colors.map_color(cell.id),
                self.config.mirror_z,
            );
            stats.cells += 1;
            stats.triangles += self.triangles.len() / 3;
        }

        trace!(
            sites = stats.sites,
            cells = stats.cells,
            culled = stats.culled,
            triangles = stats.triangles,
            "frame built"
        );
        Ok(stats)
    }

    /// Meshes filled by the last [`build_frame`](Self::build_frame)
    pub fn meshes(&self) -> impl Iterator<Item = &ShardMesh> + '_ {
        self.pool.active()
    }

    /// Re-deal the palette colors
    pub fn reshuffle_colors(&mut self) {
        self.colors.shuffle(&mut self.rng);
    }

    /// Replace the palette
    pub fn set_palette(&mut self, palette: &[Hsl]) {
        self.colors = PaletteColorMapper::new(palette);
    }

    /// Regenerate particles from the configured layout
    pub fn reset_particles(&mut self) {
        self.particles = self.config.layout.generate(&mut self.rng);
        self.pool.resize(self.particles.len());
        debug!(particles = self.particles.len(), "particles regenerated");
    }

    /// Scene rotation about y, in radians
    pub fn y_rotation(&self) -> f64 {
        self.y_rotation
    }

    /// Current inset heave in `[0.1, 1.0]`
    pub fn inset_heave(&self) -> f64 {
        self.inset_heave
    }

    /// Current displacement heave in `[0.1, 1.0]`
    pub fn displace_heave(&self) -> f64 {
        self.displace_heave
    }

    /// Scene configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The bounded region
    pub fn region(&self) -> &BoundedRegion {
        &self.region
    }

    /// Containment tester for the region
    pub fn tester(&self) -> &VolumeTester {
        &self.tester
    }

    /// Current particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The mesh pool, including inactive slots
    pub fn pool(&self) -> &MeshPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParticleLayout, SceneConfigBuilder, WallPreset};

    fn small_scene(walls: WallPreset) -> ShardScene {
        let config = SceneConfigBuilder::new()
            .seed(42)
            .walls(walls)
            .layout(ParticleLayout::Random { count: 60 })
            .unwrap()
            .build()
            .unwrap();
        ShardScene::new(config)
    }

    #[test]
    fn test_heave_wave_range() {
        assert!((heave_wave(0.0, 1.0) - 0.55).abs() < 1e-12);
        for t in 0..1000 {
            let h = heave_wave(t as f64 * 13.7, 0.0009);
            assert!((0.1 - 1e-12..=1.0 + 1e-12).contains(&h));
        }
    }

    #[test]
    fn test_update_sets_heave() {
        let mut scene = small_scene(WallPreset::None);
        scene.update(1000.0);

        assert!((scene.y_rotation() - 0.1).abs() < 1e-12);
        assert!((scene.inset_heave() - heave_wave(1000.0, 0.0009)).abs() < 1e-12);
        assert!((scene.inset_distance() - scene.inset_heave() * 0.01).abs() < 1e-12);
        assert!((scene.displacement(0.5) - (scene.displace_heave() * 3.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_build_frame_without_walls() {
        let mut scene = small_scene(WallPreset::None);
        scene.update(0.0);
        let stats = scene.build_frame(0.0).unwrap();

        assert_eq!(stats.sites, 60);
        assert_eq!(stats.cells + stats.culled, stats.sites);
        assert_eq!(scene.meshes().count(), stats.cells);

        let triangles: usize = scene.meshes().map(|m| m.triangle_count()).sum();
        assert_eq!(triangles, stats.triangles);
        for mesh in scene.meshes() {
            assert!(!mesh.is_empty());
            assert_eq!(mesh.color[3], 1.0);
        }
    }

    #[test]
    fn test_build_frame_with_walls() {
        let mut scene = small_scene(WallPreset::Tetra);
        for frame in 0..3 {
            scene.update(frame as f64 * 16.0);
            let stats = scene.build_frame(0.0).unwrap();
            assert_eq!(stats.cells + stats.culled, stats.sites);
        }
        // Mirrored meshes stay within the mirrored region box
        for mesh in scene.meshes() {
            assert!(mesh.positions.iter().all(|p| p[1].abs() < 2.0));
        }
    }

    #[test]
    fn test_scene_is_deterministic() {
        let mut a = small_scene(WallPreset::None);
        let mut b = small_scene(WallPreset::None);
        for frame in 0..5 {
            a.update(frame as f64 * 16.0);
            b.update(frame as f64 * 16.0);
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.build_frame(0.2).unwrap(), b.build_frame(0.2).unwrap());
        assert_eq!(a.pool().slots(), b.pool().slots());
    }

    #[test]
    fn test_reset_particles_resizes_pool() {
        let mut scene = small_scene(WallPreset::None);
        assert_eq!(scene.pool().len(), 60);
        scene.reset_particles();
        assert_eq!(scene.particles().len(), 60);
        assert_eq!(scene.pool().len(), 60);

        scene.reshuffle_colors();
        scene.set_palette(&[Hsl::new(0.0, 100.0, 50.0)]);
        scene.build_frame(0.0).unwrap();
        assert!(scene.meshes().all(|m| m.color == [1.0, 0.0, 0.0, 1.0]));
    }
}
