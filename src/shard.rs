//! Shards: cell shells placed in the scene
//!
//! A shard copies one cell's shell and can push it away from the vertical
//! axis ("heave"), so the solid appears to break apart while the underlying
//! tessellation stays untouched.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::CellPolytope;
use crate::mesh::append_face_fans;

/// How far a unit of displacement moves a shard
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaveParams {
    /// Outward push along the site's horizontal direction
    pub push: f64,
    /// Relative stretch of the site's height
    pub stretch: f64,
}

impl Default for HeaveParams {
    fn default() -> Self {
        Self {
            push: 0.05,
            stretch: 0.2,
        }
    }
}

impl HeaveParams {
    /// Where a site moves for a given displacement
    ///
    /// The site is pushed outward in the x/z plane by `push * displacement`
    /// and its height is then scaled by `1 + stretch * displacement`. Sites on
    /// the vertical axis are only stretched.
    pub fn displace_site(&self, site: DVec3, displacement: f64) -> DVec3 {
        if displacement == 0.0 {
            return site;
        }
        let horizontal = DVec3::new(site.x, 0.0, site.z).normalize_or_zero();
        let mut moved = site + horizontal * (self.push * displacement);
        moved.y *= 1.0 + self.stretch * displacement;
        moved
    }
}

/// A displaced copy of one cell shell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    /// Id of the source cell
    pub id: usize,
    /// Displaced site position
    pub site: DVec3,
    /// Absolute vertex positions around the displaced site
    pub vertices: Vec<DVec3>,
    /// Face loops, shared layout with the source cell
    pub faces: Vec<Vec<usize>>,
}

impl Shard {
    /// Place `cell` with the given heave displacement
    ///
    /// The cell is only read; vertices keep their offsets from the site and
    /// follow it to its displaced position.
    pub fn new(cell: &CellPolytope, displacement: f64, heave: &HeaveParams) -> Self {
        let site = heave.displace_site(cell.site, displacement);
        Self {
            id: cell.id,
            site,
            vertices: cell.relative_vertices().map(|v| v + site).collect(),
            faces: cell.faces.clone(),
        }
    }

    /// Positions of one face's vertices, in winding order
    pub fn face_points(&self, face_index: usize) -> Vec<DVec3> {
        self.faces
            .get(face_index)
            .map(|face| face.iter().map(|&i| self.vertices[i]).collect())
            .unwrap_or_default()
    }

    /// Append this shard's triangles as flat vertex triples
    pub fn append_triangles(&self, out: &mut Vec<DVec3>) {
        append_face_fans(&self.vertices, &self.faces, out);
    }

    /// This shard's triangles as flat vertex triples
    pub fn triangles(&self) -> Vec<DVec3> {
        let mut out = Vec::new();
        self.append_triangles(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ConvexPolytope;

    fn unit_cell(site: DVec3) -> CellPolytope {
        let poly = ConvexPolytope::from_box(site - 0.5, site + 0.5);
        CellPolytope::from_polytope(7, site, poly)
    }

    #[test]
    fn test_no_displacement_keeps_vertices() {
        let cell = unit_cell(DVec3::new(0.3, 0.2, -0.4));
        let shard = Shard::new(&cell, 0.0, &HeaveParams::default());

        assert_eq!(shard.id, 7);
        assert_eq!(shard.site, cell.site);
        for (a, b) in shard.vertices.iter().zip(&cell.vertices) {
            assert!((*a - *b).length() < 1e-12);
        }
    }

    #[test]
    fn test_heave_moves_site() {
        let heave = HeaveParams::default();
        let site = DVec3::new(3.0, 0.5, 4.0);
        let moved = heave.displace_site(site, 2.0);

        // Push 0.1 along (0.6, 0, 0.8), then stretch y by 1.4
        assert!((moved.x - 3.06).abs() < 1e-12);
        assert!((moved.z - 4.08).abs() < 1e-12);
        assert!((moved.y - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_heave_on_axis() {
        let heave = HeaveParams::default();
        let moved = heave.displace_site(DVec3::new(0.0, -0.5, 0.0), 1.0);
        assert_eq!(moved.x, 0.0);
        assert_eq!(moved.z, 0.0);
        assert!((moved.y + 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_shard_keeps_shape() {
        let cell = unit_cell(DVec3::new(0.5, 0.0, 0.0));
        let shard = Shard::new(&cell, 3.0, &HeaveParams::default());

        let offset = shard.site - cell.site;
        assert!(offset.x > 0.0);
        for (a, b) in shard.vertices.iter().zip(&cell.vertices) {
            assert!((*a - *b - offset).length() < 1e-12);
        }
        assert_eq!(shard.face_points(0).len(), 4);
        assert!(shard.face_points(10).is_empty());
    }

    #[test]
    fn test_shard_triangles() {
        let cell = unit_cell(DVec3::ZERO);
        let shard = Shard::new(&cell, 0.0, &HeaveParams::default());
        // Six quads, four fan triangles each
        assert_eq!(shard.triangles().len(), 6 * 4 * 3);
    }
}
