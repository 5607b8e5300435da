//! Half-space planes
//!
//! A plane stores a unit normal and an offset; the interior half-space is
//! `{p : dot(p, normal) <= offset}`, so the normal points outward.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::PLANE_EPSILON;
use crate::error::{Result, ShardError};

/// An oriented plane bounding a half-space
///
/// Normals given to [`Plane::new`] do not need unit length. They are
/// normalized on construction and the offset is divided by the same length,
/// which describes exactly the same half-space as the raw `(n, d)` pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    offset: f64,
}

impl Plane {
    /// Create a plane from an arbitrary-length normal and an offset
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the normal is zero-length or any
    /// component is not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_shards::{Plane, DVec3};
    ///
    /// // x <= 0.5, written with a scaled normal
    /// let plane = Plane::new(DVec3::new(2.0, 0.0, 0.0), 1.0).unwrap();
    /// assert_eq!(plane.normal(), DVec3::X);
    /// assert_eq!(plane.offset(), 0.5);
    /// ```
    pub fn new(normal: DVec3, offset: f64) -> Result<Self> {
        if !normal.is_finite() || !offset.is_finite() {
            return Err(ShardError::InvalidGeometry(format!(
                "plane ({}, {}, {}) / {} is not finite",
                normal.x, normal.y, normal.z, offset
            )));
        }
        let length = normal.length();
        if length <= f64::EPSILON {
            return Err(ShardError::InvalidGeometry(
                "plane normal must have non-zero length".into(),
            ));
        }
        Ok(Self::from_unit(normal / length, offset / length))
    }

    /// Build a plane whose normal is already unit length
    #[inline]
    pub(crate) fn from_unit(normal: DVec3, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Perpendicular bisector of `site` and `other`, interior on `site`'s side
    ///
    /// Returns `None` when the two points are (nearly) coincident.
    pub fn bisector(site: DVec3, other: DVec3) -> Option<Self> {
        let delta = other - site;
        let length = delta.length();
        if length < PLANE_EPSILON {
            return None;
        }
        let normal = delta / length;
        let midpoint = (site + other) * 0.5;
        Some(Self::from_unit(normal, midpoint.dot(normal)))
    }

    /// Unit outward normal
    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Offset along the unit normal
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed distance of `point`; positive values lie outside
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        point.dot(self.normal) - self.offset
    }

    /// Whether `point` is inside or on the plane (within [`PLANE_EPSILON`])
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        self.signed_distance(point) <= PLANE_EPSILON
    }

    /// The same plane moved inward (against its normal) by `distance`
    #[inline]
    pub fn shifted_inward(&self, distance: f64) -> Self {
        Self::from_unit(self.normal, self.offset - distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        let plane = Plane::new(DVec3::new(1.0, 0.4, 0.0), 0.4).unwrap();
        let length = (1.0f64 + 0.16).sqrt();
        assert!((plane.normal().length() - 1.0).abs() < 1e-12);
        assert!((plane.offset() - 0.4 / length).abs() < 1e-12);

        // Same half-space as the raw form
        let p = DVec3::new(0.2, 0.3, 0.0);
        let raw_inside = p.dot(DVec3::new(1.0, 0.4, 0.0)) <= 0.4;
        assert_eq!(plane.contains(p), raw_inside);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(Plane::new(DVec3::ZERO, 1.0).is_err());
        assert!(Plane::new(DVec3::new(f64::NAN, 0.0, 1.0), 1.0).is_err());
        assert!(Plane::new(DVec3::X, f64::INFINITY).is_err());
    }

    #[test]
    fn test_bisector() {
        let a = DVec3::new(-0.5, 0.0, 0.0);
        let b = DVec3::new(0.5, 0.0, 0.0);
        let plane = Plane::bisector(a, b).unwrap();
        assert_eq!(plane.normal(), DVec3::X);
        assert!(plane.offset().abs() < 1e-15);
        assert!(plane.contains(a));
        assert!(!plane.contains(b));

        assert!(Plane::bisector(a, a).is_none());
    }

    #[test]
    fn test_shifted_inward() {
        let plane = Plane::new(DVec3::Y, 1.0).unwrap().shifted_inward(0.25);
        assert!((plane.offset() - 0.75).abs() < 1e-15);
        assert!(!plane.contains(DVec3::new(0.0, 0.8, 0.0)));
    }
}
