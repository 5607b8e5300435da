//! Voronoi cell construction by half-space clipping
//!
//! Every cell starts as the region polytope (box clipped by walls) and is cut
//! by the perpendicular bisector of each other site, nearest first. A site
//! further away than twice the cell's current radius cannot cut it, which
//! ends the loop early; the spatial index uses the same rule to avoid even
//! looking at distant sites.

use std::cmp::Ordering;

use glam::DVec3;
use tracing::{debug, trace};

use super::inset::inset_with_scratch;
use crate::cell::{CellPolytope, InsetCellPolytope, Site};
use crate::error::{Result, ShardError};
use crate::geometry::{ClipOutcome, ClipScratch, ConvexPolytope, Plane};
use crate::region::BoundedRegion;

#[cfg(feature = "spatial-index")]
use crate::spatial::SiteIndex;

/// Site count from which [`NeighborSearch::Auto`] switches to the KD-tree
pub const SPATIAL_INDEX_MIN_SITES: usize = 48;

/// Strategy for finding the sites that may cut a cell
///
/// Both strategies visit cutting sites in the same order and produce
/// identical cells; they only differ in how many sites they look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborSearch {
    /// KD-tree for large site sets when available, brute force otherwise
    #[default]
    Auto,
    /// Sort all other sites by distance
    BruteForce,
    /// Query a KD-tree with a growing radius
    #[cfg(feature = "spatial-index")]
    SpatialIndex,
}

/// Output of one tessellation pass
///
/// `cells[i]` belongs to `sites[i]` of the input. Insets are present when a
/// non-zero inset distance was requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tessellation {
    /// One cell per input site, in input order
    pub cells: Vec<CellPolytope>,
    /// Inset shells, parallel to `cells`
    pub insets: Option<Vec<InsetCellPolytope>>,
    /// Inset distance the shells were built with
    pub inset_distance: f64,
}

impl Tessellation {
    /// A tessellation with no cells
    pub fn empty(inset_distance: f64) -> Self {
        Self {
            cells: Vec::new(),
            insets: None,
            inset_distance,
        }
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The renderable shell of cell `index`
    ///
    /// This is the inset when one exists and still has volume, and the cell
    /// itself otherwise.
    pub fn shell(&self, index: usize) -> Option<&CellPolytope> {
        let cell = self.cells.get(index)?;
        let inset = self
            .insets
            .as_ref()
            .and_then(|insets| insets.get(index))
            .filter(|inset| !inset.vertices.is_empty());
        Some(inset.unwrap_or(cell))
    }

    /// Shells for every cell, in order
    pub fn shells(&self) -> impl Iterator<Item = &CellPolytope> + '_ {
        (0..self.cells.len()).filter_map(move |i| self.shell(i))
    }

    /// Sum of all cell volumes
    pub fn total_volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }
}

/// Reusable Voronoi cell builder
///
/// Holds scratch buffers between calls, so a builder kept across animation
/// frames does not reallocate its bookkeeping every frame.
#[derive(Debug, Default)]
pub struct CellBuilder {
    search: NeighborSearch,
    scratch: ClipScratch,
    order: Vec<(f64, usize)>,
    #[cfg(feature = "spatial-index")]
    candidates: Vec<usize>,
}

impl CellBuilder {
    /// Create a builder with automatic neighbor search
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a fixed neighbor search strategy
    pub fn with_search(search: NeighborSearch) -> Self {
        Self {
            search,
            ..Self::default()
        }
    }

    /// The configured search strategy
    pub fn search(&self) -> NeighborSearch {
        self.search
    }

    /// Compute the Voronoi cell of every site inside `region`
    ///
    /// Degenerate cells are returned with (near) zero volume. An inverted box
    /// or walls that exclude everything produce an empty tessellation.
    ///
    /// # Errors
    ///
    /// - `InvalidGeometry` if `inset_distance` is negative or not finite, or a
    ///   site position is not finite
    /// - `SiteOutsideRegion` if a site lies outside the region's box
    pub fn build(
        &mut self,
        region: &BoundedRegion,
        sites: &[Site],
        inset_distance: f64,
    ) -> Result<Tessellation> {
        validate_inset_distance(inset_distance)?;

        if !region.has_valid_box() {
            debug!("region box is invalid, returning no cells");
            return Ok(Tessellation::empty(inset_distance));
        }

        for site in sites {
            if !site.position.is_finite() {
                return Err(ShardError::InvalidGeometry(format!(
                    "site {} has a non-finite position",
                    site.id
                )));
            }
            if !region.box_contains(site.position) {
                return Err(ShardError::SiteOutsideRegion {
                    id: site.id,
                    position: site.position,
                });
            }
        }

        let seed = region.to_polytope();
        if seed.is_empty() {
            debug!("region is empty, returning no cells");
            return Ok(Tessellation::empty(inset_distance));
        }

        let positions: Vec<DVec3> = sites.iter().map(|s| s.position).collect();
        let polytopes = self.clip_all(&seed, &positions, region);

        let cells: Vec<CellPolytope> = polytopes
            .into_iter()
            .zip(sites)
            .map(|(poly, site)| {
                if poly.is_empty() {
                    CellPolytope::empty(site.id, site.position)
                } else {
                    CellPolytope::from_polytope(site.id, site.position, poly)
                }
            })
            .collect();

        let insets = if inset_distance != 0.0 {
            let scratch = &mut self.scratch;
            Some(
                cells
                    .iter()
                    .map(|cell| inset_with_scratch(cell, inset_distance, scratch))
                    .collect(),
            )
        } else {
            None
        };

        let tessellation = Tessellation {
            cells,
            insets,
            inset_distance,
        };
        trace!(
            sites = sites.len(),
            volume = tessellation.total_volume(),
            inset_distance,
            "tessellation built"
        );
        Ok(tessellation)
    }

    fn clip_all(
        &mut self,
        seed: &ConvexPolytope,
        positions: &[DVec3],
        region: &BoundedRegion,
    ) -> Vec<ConvexPolytope> {
        match self.search {
            NeighborSearch::BruteForce => self.clip_all_brute(seed, positions),
            #[cfg(feature = "spatial-index")]
            NeighborSearch::SpatialIndex => self.clip_all_indexed(seed, positions, region),
            NeighborSearch::Auto => {
                #[cfg(feature = "spatial-index")]
                if positions.len() >= SPATIAL_INDEX_MIN_SITES {
                    return self.clip_all_indexed(seed, positions, region);
                }
                let _ = region;
                self.clip_all_brute(seed, positions)
            }
        }
    }

    fn clip_all_brute(&mut self, seed: &ConvexPolytope, positions: &[DVec3]) -> Vec<ConvexPolytope> {
        let Self { scratch, order, .. } = self;

        positions
            .iter()
            .enumerate()
            .map(|(i, &site)| {
                order.clear();
                order.extend(
                    positions
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(j, p)| (p.distance_squared(site), j)),
                );
                order.sort_by(compare_candidates);

                let mut poly = seed.clone();
                let mut reach_sq = 4.0 * poly.max_radius_sq(site);
                for &(dist_sq, j) in order.iter() {
                    if dist_sq > reach_sq {
                        break;
                    }
                    if clip_by_neighbor(&mut poly, positions, i, j, scratch) {
                        reach_sq = 4.0 * poly.max_radius_sq(site);
                    }
                    if poly.is_empty() {
                        break;
                    }
                }
                poly
            })
            .collect()
    }

    #[cfg(feature = "spatial-index")]
    fn clip_all_indexed(
        &mut self,
        seed: &ConvexPolytope,
        positions: &[DVec3],
        region: &BoundedRegion,
    ) -> Vec<ConvexPolytope> {
        if positions.is_empty() {
            return Vec::new();
        }

        let index = SiteIndex::new(positions);
        let extent = (region.max - region.min).length() + 4.0 * crate::geometry::PLANE_EPSILON;
        let box_volume = (region.max - region.min).element_product();
        let mut initial_radius = 2.0 * (box_volume / positions.len() as f64).cbrt();
        if !(initial_radius > 0.0 && initial_radius.is_finite()) {
            initial_radius = extent;
        }

        let Self {
            scratch,
            order,
            candidates,
            ..
        } = self;

        positions
            .iter()
            .enumerate()
            .map(|(i, &site)| {
                let mut poly = seed.clone();
                let mut reach_sq = 4.0 * poly.max_radius_sq(site);
                let mut covered_sq = -1.0;
                let mut radius = initial_radius.min(extent);

                loop {
                    let radius_sq = radius * radius;
                    candidates.clear();
                    index.candidates_within(site, radius, candidates);

                    order.clear();
                    order.extend(candidates.iter().filter(|&&j| j != i).filter_map(|&j| {
                        let dist_sq = positions[j].distance_squared(site);
                        (dist_sq > covered_sq && dist_sq <= radius_sq).then_some((dist_sq, j))
                    }));
                    order.sort_by(compare_candidates);

                    let mut stopped = false;
                    for &(dist_sq, j) in order.iter() {
                        if dist_sq > reach_sq {
                            stopped = true;
                            break;
                        }
                        if clip_by_neighbor(&mut poly, positions, i, j, scratch) {
                            reach_sq = 4.0 * poly.max_radius_sq(site);
                        }
                        if poly.is_empty() {
                            stopped = true;
                            break;
                        }
                    }

                    if stopped || reach_sq <= radius_sq || radius >= extent {
                        break;
                    }
                    covered_sq = radius_sq;
                    radius = reach_sq.sqrt().max(radius * 1.5).min(extent);
                }
                poly
            })
            .collect()
    }
}

/// Compute the Voronoi cell of every site inside `region`
///
/// One-shot form of [`CellBuilder::build`] with automatic neighbor search.
///
/// # Example
///
/// ```
/// use voronoi_shards::{build_cells, BoundedRegion, Site, DVec3};
///
/// let region = BoundedRegion::cube(1.0);
/// let sites = [
///     Site::new(0, DVec3::new(-0.5, 0.0, 0.0)),
///     Site::new(1, DVec3::new(0.5, 0.0, 0.0)),
/// ];
///
/// let tessellation = build_cells(&region, &sites, 0.0).unwrap();
/// assert_eq!(tessellation.len(), 2);
/// assert!((tessellation.cells[0].volume - 4.0).abs() < 1e-9);
/// ```
pub fn build_cells(
    region: &BoundedRegion,
    sites: &[Site],
    inset_distance: f64,
) -> Result<Tessellation> {
    CellBuilder::new().build(region, sites, inset_distance)
}

pub(crate) fn validate_inset_distance(distance: f64) -> Result<()> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(ShardError::InvalidGeometry(format!(
            "inset distance must be finite and >= 0 (got {})",
            distance
        )));
    }
    Ok(())
}

/// Nearest first, ties by index
fn compare_candidates(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.partial_cmp(&b.0)
        .unwrap_or(Ordering::Equal)
        .then(a.1.cmp(&b.1))
}

/// Cut the cell of site `i` by its bisector with site `j`
///
/// Coincident sites have no bisector: the lower index keeps the space and
/// the other cell is emptied. Returns whether the polytope changed.
fn clip_by_neighbor(
    poly: &mut ConvexPolytope,
    positions: &[DVec3],
    i: usize,
    j: usize,
    scratch: &mut ClipScratch,
) -> bool {
    match Plane::bisector(positions[i], positions[j]) {
        Some(plane) => poly.clip_with_scratch(&plane, scratch) != ClipOutcome::Unchanged,
        None if j < i => {
            *poly = ConvexPolytope::default();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_sites(count: usize, seed: u64) -> Vec<Site> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|id| {
                Site::new(
                    id,
                    DVec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_site_fills_box() {
        let region = BoundedRegion::cube(1.0);
        let sites = [Site::new(3, DVec3::new(0.2, -0.4, 0.1))];
        let tess = build_cells(&region, &sites, 0.0).unwrap();

        assert_eq!(tess.len(), 1);
        assert_eq!(tess.cells[0].id, 3);
        assert!((tess.cells[0].volume - 8.0).abs() < 1e-12);
        assert_eq!(tess.cells[0].vertex_count(), 8);
        assert_eq!(tess.cells[0].face_count(), 6);
        assert!(tess.insets.is_none());
    }

    #[test]
    fn test_two_sites_split() {
        let region = BoundedRegion::cube(1.0);
        let sites = [
            Site::new(0, DVec3::new(-0.5, 0.0, 0.0)),
            Site::new(1, DVec3::new(0.5, 0.0, 0.0)),
        ];
        let tess = build_cells(&region, &sites, 0.0).unwrap();

        assert!((tess.cells[0].volume - 4.0).abs() < 1e-12);
        assert!((tess.cells[1].volume - 4.0).abs() < 1e-12);
        assert!(tess.cells[0].vertices.iter().all(|v| v.x <= 1e-12));
        assert!(tess.cells[1].vertices.iter().all(|v| v.x >= -1e-12));
    }

    #[test]
    fn test_wall_clips_cell() {
        let region = BoundedRegion::cube(1.0).with_wall(Plane::new(DVec3::X, 0.5).unwrap());
        let tess = build_cells(&region, &[Site::new(0, DVec3::ZERO)], 0.0).unwrap();
        assert!((tess.cells[0].volume - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_partition_random_sites() {
        let region = BoundedRegion::cube(1.0);
        let sites = random_sites(30, 7);
        let tess = build_cells(&region, &sites, 0.0).unwrap();

        assert_eq!(tess.len(), 30);
        assert!((tess.total_volume() - 8.0).abs() < 1e-9);
        for (cell, site) in tess.cells.iter().zip(&sites) {
            assert_eq!(cell.id, site.id);
            assert!(cell.contains(site.position));
        }
    }

    #[test]
    fn test_coincident_sites() {
        let region = BoundedRegion::cube(1.0);
        let sites = [
            Site::new(0, DVec3::new(0.3, 0.3, 0.3)),
            Site::new(1, DVec3::new(0.3, 0.3, 0.3)),
            Site::new(2, DVec3::new(-0.5, 0.0, 0.0)),
        ];
        let tess = build_cells(&region, &sites, 0.0).unwrap();

        assert!(tess.cells[0].volume > 0.0);
        assert_eq!(tess.cells[1].volume, 0.0);
        assert!(tess.cells[1].is_degenerate());
        assert!((tess.total_volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_site_outside_box_is_error() {
        let region = BoundedRegion::cube(1.0);
        let sites = [Site::new(5, DVec3::new(1.5, 0.0, 0.0))];
        let result = build_cells(&region, &sites, 0.0);
        assert!(matches!(result, Err(ShardError::SiteOutsideRegion { id: 5, .. })));

        let sites = [Site::new(0, DVec3::new(f64::NAN, 0.0, 0.0))];
        assert!(matches!(
            build_cells(&region, &sites, 0.0),
            Err(ShardError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_negative_inset_is_error() {
        let region = BoundedRegion::cube(1.0);
        let sites = [Site::new(0, DVec3::ZERO)];
        assert!(build_cells(&region, &sites, -0.1).is_err());
        assert!(build_cells(&region, &sites, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_region_returns_empty() {
        let inverted = BoundedRegion::new(DVec3::splat(1.0), DVec3::splat(-1.0));
        let tess = build_cells(&inverted, &[Site::new(0, DVec3::ZERO)], 0.0).unwrap();
        assert!(tess.is_empty());

        let walled_off = BoundedRegion::cube(1.0)
            .with_wall(Plane::new(DVec3::Y, -2.0).unwrap());
        let tess = build_cells(&walled_off, &[Site::new(0, DVec3::ZERO)], 0.0).unwrap();
        assert!(tess.is_empty());
    }

    #[test]
    fn test_no_sites() {
        let tess = build_cells(&BoundedRegion::cube(1.0), &[], 0.1).unwrap();
        assert!(tess.is_empty());
        assert_eq!(tess.total_volume(), 0.0);
    }

    #[test]
    fn test_insets_present_when_requested() {
        let region = BoundedRegion::cube(1.0);
        let sites = random_sites(8, 3);
        let tess = build_cells(&region, &sites, 0.02).unwrap();

        let insets = tess.insets.as_ref().unwrap();
        assert_eq!(insets.len(), tess.len());
        for (cell, inset) in tess.cells.iter().zip(insets) {
            assert_eq!(cell.id, inset.id);
            assert!(inset.volume < cell.volume);
        }
        assert!(std::ptr::eq(tess.shell(0).unwrap(), &insets[0]));
    }

    #[test]
    fn test_shell_falls_back_to_cell() {
        let region = BoundedRegion::cube(1.0);
        // An inset wider than the box collapses every shell
        let tess = build_cells(&region, &[Site::new(0, DVec3::ZERO)], 5.0).unwrap();
        assert_eq!(tess.insets.as_ref().unwrap()[0].volume, 0.0);
        assert!(std::ptr::eq(tess.shell(0).unwrap(), &tess.cells[0]));
        assert!(tess.shell(1).is_none());
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_search_strategies_agree() {
        let region = BoundedRegion::cube(1.0).with_walls(crate::region::tetra_walls());
        let tester = crate::region::VolumeTester::new(&region);
        let sites: Vec<Site> = random_sites(2000, 11)
            .into_iter()
            .filter(|s| tester.is_inside(s.position))
            .collect();
        assert!(sites.len() > SPATIAL_INDEX_MIN_SITES);

        let brute = CellBuilder::with_search(NeighborSearch::BruteForce)
            .build(&region, &sites, 0.01)
            .unwrap();
        let indexed = CellBuilder::with_search(NeighborSearch::SpatialIndex)
            .build(&region, &sites, 0.01)
            .unwrap();

        assert_eq!(brute, indexed);
    }

    #[test]
    fn test_builder_reuse() {
        let region = BoundedRegion::cube(1.0);
        let mut builder = CellBuilder::new();
        let first = builder.build(&region, &random_sites(20, 1), 0.0).unwrap();
        let second = builder.build(&region, &random_sites(20, 1), 0.0).unwrap();
        assert_eq!(first, second);
    }
}
