//! Inset shells
//!
//! An inset moves every face plane of a cell inward by the same distance and
//! keeps what lies behind all of them. The result is a smaller convex solid
//! that leaves a visible gap between neighbouring shards.

use super::voronoi::validate_inset_distance;
use crate::cell::{CellPolytope, InsetCellPolytope};
use crate::error::Result;
use crate::geometry::{face_plane, ClipScratch, Plane};

/// Shrink a cell by moving each face `distance` toward the interior
///
/// A distance of zero returns a copy of the cell. When the inset consumes the
/// whole cell the result is empty, with zero volume.
///
/// # Errors
///
/// Returns `InvalidGeometry` if `distance` is negative or not finite.
///
/// # Example
///
/// ```
/// use voronoi_shards::{build_cells, inset_cell, BoundedRegion, Site, DVec3};
///
/// let region = BoundedRegion::cube(1.0);
/// let tessellation = build_cells(&region, &[Site::new(0, DVec3::ZERO)], 0.0).unwrap();
///
/// let shell = inset_cell(&tessellation.cells[0], 0.25).unwrap();
/// assert!((shell.volume - 1.5f64.powi(3)).abs() < 1e-9);
/// ```
pub fn inset_cell(cell: &CellPolytope, distance: f64) -> Result<InsetCellPolytope> {
    validate_inset_distance(distance)?;
    Ok(inset_with_scratch(cell, distance, &mut ClipScratch::default()))
}

/// Inset without validation, reusing clip buffers
pub(crate) fn inset_with_scratch(
    cell: &CellPolytope,
    distance: f64,
    scratch: &mut ClipScratch,
) -> InsetCellPolytope {
    if distance == 0.0 || cell.faces.is_empty() {
        return cell.clone();
    }

    let planes: Vec<Plane> = cell
        .faces
        .iter()
        .filter_map(|face| face_plane(&cell.vertices, face))
        .map(|plane| plane.shifted_inward(distance))
        .collect();

    let mut poly = cell.to_polytope();
    for plane in &planes {
        poly.clip_with_scratch(plane, scratch);
        if poly.is_empty() {
            return CellPolytope::empty(cell.id, cell.site);
        }
    }

    CellPolytope::from_polytope(cell.id, cell.site, poly)
}
