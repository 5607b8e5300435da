//! Voronoi cell structure
//!
//! A cell is one site's share of the bounded region: a convex polytope with
//! its volume and the site it was built around.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{
    face_centroid, polygon_area, polytope_contains, polytope_volume, ConvexPolytope,
    DEGENERATE_VOLUME,
};

/// A point around which one Voronoi cell is built
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Stable per-particle identifier, echoed into the cell
    pub id: usize,
    /// Position inside the region box
    pub position: DVec3,
}

impl Site {
    /// Create a site
    pub fn new(id: usize, position: DVec3) -> Self {
        Self { id, position }
    }
}

/// The convex solid belonging to one site
///
/// # Invariants
///
/// - every index in every face is `< vertices.len()`
/// - every face has at least 3 vertices
/// - faces are wound counter-clockwise seen from outside
///
/// Vertices are absolute positions. A cell with fewer than 4 vertices or no
/// volume is degenerate; it is still a valid value and callers decide
/// whether to cull it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CellPolytope {
    /// Identifier of the site this cell belongs to
    pub id: usize,
    /// Site position
    pub site: DVec3,
    /// Enclosed volume, never negative
    pub volume: f64,
    /// Vertex positions
    pub vertices: Vec<DVec3>,
    /// Face loops of vertex indices
    pub faces: Vec<Vec<usize>>,
}

/// A cell whose faces were pushed inward; same shape as [`CellPolytope`]
pub type InsetCellPolytope = CellPolytope;

impl CellPolytope {
    /// Wrap a clipped polytope, computing its volume
    pub fn from_polytope(id: usize, site: DVec3, polytope: ConvexPolytope) -> Self {
        let volume = polytope.volume();
        let (vertices, faces) = polytope.into_parts();
        Self {
            id,
            site,
            volume,
            vertices,
            faces,
        }
    }

    /// An empty cell for a site that received no space
    pub fn empty(id: usize, site: DVec3) -> Self {
        Self {
            id,
            site,
            volume: 0.0,
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Rebuild the working polytope for further clipping
    pub fn to_polytope(&self) -> ConvexPolytope {
        ConvexPolytope::from_parts(self.vertices.clone(), self.faces.clone())
    }

    /// Whether the cell is too small to render
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 4 || self.volume <= DEGENERATE_VOLUME
    }

    /// Get the vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the face count
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertices relative to the site
    pub fn relative_vertices(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vertices.iter().map(move |&v| v - self.site)
    }

    /// Positions of one face's vertices, in winding order
    pub fn face_points(&self, face_index: usize) -> Vec<DVec3> {
        self.faces
            .get(face_index)
            .map(|face| face.iter().map(|&i| self.vertices[i]).collect())
            .unwrap_or_default()
    }

    /// Area of one face (0 for an out-of-range index)
    pub fn face_area(&self, face_index: usize) -> f64 {
        self.faces
            .get(face_index)
            .map(|face| polygon_area(&self.vertices, face))
            .unwrap_or(0.0)
    }

    /// Total boundary area
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| polygon_area(&self.vertices, face))
            .sum()
    }

    /// Mean of a face's vertices
    pub fn face_centroid(&self, face_index: usize) -> Option<DVec3> {
        self.faces
            .get(face_index)
            .map(|face| face_centroid(&self.vertices, face))
    }

    /// Volume recomputed from the current vertex and face data
    pub fn computed_volume(&self) -> f64 {
        polytope_volume(&self.vertices, &self.faces)
    }

    /// Whether `point` lies inside or on the cell boundary
    pub fn contains(&self, point: DVec3) -> bool {
        polytope_contains(&self.vertices, &self.faces, point)
    }
}
