//! Geometry primitives
//!
//! Double-precision planes and a mutable convex polytope that can be clipped
//! by half-spaces. Everything else in the crate (cells, insets, containment)
//! is built on these two types.

mod plane;
mod polytope;

pub use plane::Plane;
pub use polytope::{
    face_centroid, face_normal, face_plane, polygon_area, polytope_contains, polytope_volume,
    ClipOutcome, ClipScratch, ConvexPolytope,
};

/// Tolerance for plane-side classification
///
/// Vertices closer than this to a cutting plane count as lying on it, so
/// floating-point noise never spawns sliver vertices.
pub const PLANE_EPSILON: f64 = 1e-9;

/// Volume at or below which a cell is treated as degenerate
pub const DEGENERATE_VOLUME: f64 = 1e-12;
