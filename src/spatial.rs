//! Spatial indexing for neighbor candidate lookups
//!
//! This module is only available with the `spatial-index` feature. The cell
//! builder uses it to avoid visiting every other site when a cell is already
//! small enough that distant sites cannot cut it.

use glam::DVec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around a KD-tree of site positions
///
/// Items are indices into the slice the index was built from.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Nearest query: O(log n)
/// - Radius query: O(log n + k) for k results
#[derive(Clone)]
pub struct SiteIndex {
    tree: ImmutableKdTree<f64, usize, 3, 32>,
    len: usize,
}

impl SiteIndex {
    /// Build an index over site positions
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_shards::{SiteIndex, DVec3};
    ///
    /// let positions = vec![
    ///     DVec3::new(1.0, 0.0, 0.0),
    ///     DVec3::new(0.0, 1.0, 0.0),
    ///     DVec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SiteIndex::new(&positions);
    /// assert_eq!(index.find_nearest(DVec3::new(0.9, 0.1, 0.0)), Some(0));
    /// ```
    pub fn new(positions: &[DVec3]) -> Self {
        let points: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            len: positions.len(),
        }
    }

    /// Number of indexed positions
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the position nearest to `position`
    pub fn find_nearest(&self, position: DVec3) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(result.item)
    }

    /// Append the indices of all positions within `radius` of `position`
    ///
    /// The query is padded slightly so points exactly on the sphere are never
    /// missed; callers filter by their own distance test. Order is
    /// unspecified.
    pub fn candidates_within(&self, position: DVec3, radius: f64, out: &mut Vec<usize>) {
        if self.is_empty() {
            return;
        }
        let radius_sq = radius * radius * (1.0 + 1e-9) + 1e-18;
        out.extend(
            self.tree
                .within_unsorted::<SquaredEuclidean>(&position.to_array(), radius_sq)
                .into_iter()
                .map(|neighbour| neighbour.item),
        );
    }
}

impl std::fmt::Debug for SiteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteIndex").field("len", &self.len).finish()
    }
}
