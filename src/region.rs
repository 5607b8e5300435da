//! Bounded regions and point containment
//!
//! A region is an axis-aligned box intersected with any number of wall
//! half-spaces. The Voronoi builder partitions it, and [`VolumeTester`]
//! answers per-particle containment queries against it.

use glam::DVec3;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{ConvexPolytope, Plane, PLANE_EPSILON};

/// Horizontal component of the tetrahedral wall normals
const TETRA_WALL_A: f64 = 1.0;
/// Vertical component of the tetrahedral wall normals
const TETRA_WALL_B: f64 = 0.4;
/// Offset of every tetrahedral wall
const TETRA_WALL_D: f64 = 0.4;

/// Box bounds plus an ordered list of wall planes
///
/// # Example
///
/// ```
/// use voronoi_shards::{BoundedRegion, Plane, DVec3};
///
/// let wall = Plane::new(DVec3::X, 0.5).unwrap();
/// let region = BoundedRegion::cube(1.0).with_wall(wall);
/// assert!((region.volume() - 6.0).abs() < 1e-9);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedRegion {
    /// Lower box corner
    pub min: DVec3,
    /// Upper box corner
    pub max: DVec3,
    /// Additional half-space constraints, applied in order
    pub walls: Vec<Plane>,
}

impl BoundedRegion {
    /// Region bounded only by a box
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min,
            max,
            walls: Vec::new(),
        }
    }

    /// The box `[-half, half]³`
    pub fn cube(half: f64) -> Self {
        Self::new(DVec3::splat(-half), DVec3::splat(half))
    }

    /// Region from `[xmin, xmax, ymin, ymax, zmin, zmax]` and walls
    pub fn from_bounds(bounds: [f64; 6], walls: Vec<Plane>) -> Self {
        Self {
            min: DVec3::new(bounds[0], bounds[2], bounds[4]),
            max: DVec3::new(bounds[1], bounds[3], bounds[5]),
            walls,
        }
    }

    /// Add a wall
    pub fn with_wall(mut self, wall: Plane) -> Self {
        self.walls.push(wall);
        self
    }

    /// Add several walls
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Plane>) -> Self {
        self.walls.extend(walls);
        self
    }

    /// Whether the box bounds are finite and not inverted
    pub fn has_valid_box(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Whether `point` lies within the box (ignoring walls), with tolerance
    #[inline]
    pub fn box_contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min - PLANE_EPSILON).all() && point.cmple(self.max + PLANE_EPSILON).all()
    }

    /// The region as a convex polytope: the box clipped by every wall
    ///
    /// Empty when the box is inverted or the walls exclude everything.
    pub fn to_polytope(&self) -> ConvexPolytope {
        if !self.has_valid_box() {
            debug!(min = ?self.min, max = ?self.max, "region box is inverted or not finite");
            return ConvexPolytope::default();
        }

        let mut polytope = ConvexPolytope::from_box(self.min, self.max);
        for wall in &self.walls {
            polytope.clip(wall);
            if polytope.is_empty() {
                debug!(walls = self.walls.len(), "walls leave an empty region");
                break;
            }
        }
        polytope
    }

    /// Volume of the box-and-walls intersection
    pub fn volume(&self) -> f64 {
        self.to_polytope().volume()
    }
}

/// The eight sloped walls that carve the box into a double-pyramid "crystal"
///
/// Normals are `(±1, ±0.4, 0)` and `(0, ±0.4, ±1)`, each with offset 0.4.
pub fn tetra_walls() -> Vec<Plane> {
    let (a, b) = (TETRA_WALL_A, TETRA_WALL_B);
    [
        DVec3::new(a, b, 0.0),
        DVec3::new(a, -b, 0.0),
        DVec3::new(-a, -b, 0.0),
        DVec3::new(-a, b, 0.0),
        DVec3::new(0.0, b, a),
        DVec3::new(0.0, -b, a),
        DVec3::new(0.0, -b, -a),
        DVec3::new(0.0, b, -a),
    ]
    .into_iter()
    .map(|normal| {
        let length = normal.length();
        Plane::from_unit(normal / length, TETRA_WALL_D / length)
    })
    .collect()
}

/// Compiled region for fast repeated containment queries
///
/// Created once per region and queried for every particle each frame. The
/// tester is immutable, so it can be shared freely; dropping it releases it.
#[derive(Debug, Clone)]
pub struct VolumeTester {
    min: DVec3,
    max: DVec3,
    // (unit normal, offset + tolerance)
    walls: Vec<(DVec3, f64)>,
}

impl VolumeTester {
    /// Compile a region
    pub fn new(region: &BoundedRegion) -> Self {
        Self {
            min: region.min - PLANE_EPSILON,
            max: region.max + PLANE_EPSILON,
            walls: region
                .walls
                .iter()
                .map(|w| (w.normal(), w.offset() + PLANE_EPSILON))
                .collect(),
        }
    }

    /// Whether `point` lies inside the box and every wall
    ///
    /// Points within [`PLANE_EPSILON`] of the boundary count as inside.
    #[inline]
    pub fn is_inside(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all()
            && point.cmple(self.max).all()
            && self.walls.iter().all(|&(n, d)| point.dot(n) <= d)
    }

    /// Coordinate form of [`is_inside`](Self::is_inside)
    #[inline]
    pub fn is_point_inside(&self, x: f64, y: f64, z: f64) -> bool {
        self.is_inside(DVec3::new(x, y, z))
    }

    /// Number of compiled walls
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }
}
