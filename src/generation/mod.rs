//! Voronoi generation
//!
//! Bounded 3D Voronoi cells by half-space clipping, inset shells, and the
//! particle layouts that seed the sites.

mod inset;
mod particles;
mod voronoi;

pub use inset::inset_cell;
pub use particles::{random_particles, regular_particles};
pub use voronoi::{build_cells, CellBuilder, NeighborSearch, Tessellation, SPATIAL_INDEX_MIN_SITES};

use crate::cell::Site;
use crate::particle::Particle;
use crate::region::BoundedRegion;

/// Turn particles into sites, skipping those outside the region box
///
/// Site ids are particle indices, so cells can be matched back to the
/// particle (and its colour) that produced them.
pub fn sites_from_particles(particles: &[Particle], region: &BoundedRegion) -> Vec<Site> {
    particles
        .iter()
        .enumerate()
        .filter(|(_, p)| region.box_contains(p.position))
        .map(|(id, p)| Site::new(id, p.position))
        .collect()
}
