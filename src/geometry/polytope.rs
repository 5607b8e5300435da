//! Convex polytopes clipped by half-spaces
//!
//! A polytope is a vertex list plus face loops of vertex indices. Loops are
//! wound counter-clockwise seen from outside, so the right-hand normal of
//! every face points away from the interior.

use std::cmp::Ordering;
use std::collections::HashMap;

use glam::DVec3;

use super::{Plane, PLANE_EPSILON};

/// What a clip did to the polytope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOutcome {
    /// No vertex was outside the plane
    Unchanged,
    /// Part of the polytope was cut away
    Clipped,
    /// Nothing remained inside the plane
    Emptied,
}

/// Reusable buffers for [`ConvexPolytope::clip_with_scratch`]
///
/// Keeping one of these alive across clips avoids reallocating the
/// per-vertex bookkeeping on every plane.
#[derive(Debug, Default, Clone)]
pub struct ClipScratch {
    dists: Vec<f64>,
    remap: Vec<Option<usize>>,
    edge_points: HashMap<(usize, usize), usize>,
    cap: Vec<usize>,
    angles: Vec<(usize, f64)>,
    used: Vec<Option<usize>>,
}

/// A convex polytope as vertices and outward-wound face loops
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexPolytope {
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
}

impl ConvexPolytope {
    /// Axis-aligned box spanning `min..max`
    ///
    /// Vertex `i` takes `max` on the x axis when bit 0 of `i` is set, on y for
    /// bit 1 and on z for bit 2.
    pub fn from_box(min: DVec3, max: DVec3) -> Self {
        let vertices = (0..8)
            .map(|i| {
                DVec3::new(
                    if i & 1 != 0 { max.x } else { min.x },
                    if i & 2 != 0 { max.y } else { min.y },
                    if i & 4 != 0 { max.z } else { min.z },
                )
            })
            .collect();

        let faces = vec![
            vec![0, 4, 6, 2], // -x
            vec![1, 3, 7, 5], // +x
            vec![0, 1, 5, 4], // -y
            vec![2, 6, 7, 3], // +y
            vec![0, 2, 3, 1], // -z
            vec![4, 5, 7, 6], // +z
        ];

        Self { vertices, faces }
    }

    /// Wrap existing vertex and face data
    ///
    /// The caller guarantees the data describes a convex polytope with
    /// outward winding.
    pub fn from_parts(vertices: Vec<DVec3>, faces: Vec<Vec<usize>>) -> Self {
        Self { vertices, faces }
    }

    /// Vertex positions
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Face loops (indices into [`vertices`](Self::vertices))
    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Whether every part of the polytope has been clipped away
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Consume into `(vertices, faces)`
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<Vec<usize>>) {
        (self.vertices, self.faces)
    }

    /// Enclosed volume (zero for empty or flat polytopes)
    pub fn volume(&self) -> f64 {
        polytope_volume(&self.vertices, &self.faces)
    }

    /// Largest squared distance from `center` to any vertex
    pub fn max_radius_sq(&self, center: DVec3) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.distance_squared(center))
            .fold(0.0, f64::max)
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains(&self, point: DVec3) -> bool {
        polytope_contains(&self.vertices, &self.faces, point)
    }

    /// Clip to the interior of `plane`, allocating fresh scratch buffers
    pub fn clip(&mut self, plane: &Plane) -> ClipOutcome {
        let mut scratch = ClipScratch::default();
        self.clip_with_scratch(plane, &mut scratch)
    }

    /// Clip to the interior of `plane`
    ///
    /// Each face is clipped Sutherland-Hodgman style. Points where an edge
    /// crosses the plane are shared between the two faces on that edge, and
    /// together with vertices lying on the plane they form a new cap face.
    /// Faces left with fewer than 3 vertices are dropped.
    pub fn clip_with_scratch(&mut self, plane: &Plane, scratch: &mut ClipScratch) -> ClipOutcome {
        if self.faces.is_empty() {
            return ClipOutcome::Unchanged;
        }

        scratch.dists.clear();
        let mut any_outside = false;
        let mut any_inside = false;
        for &v in &self.vertices {
            let d = plane.signed_distance(v);
            if d > PLANE_EPSILON {
                any_outside = true;
            } else if d < -PLANE_EPSILON {
                any_inside = true;
            }
            scratch.dists.push(d);
        }

        if !any_outside {
            return ClipOutcome::Unchanged;
        }
        if !any_inside {
            self.vertices.clear();
            self.faces.clear();
            return ClipOutcome::Emptied;
        }

        let mut vertices = Vec::with_capacity(self.vertices.len() + 4);
        scratch.remap.clear();
        scratch.cap.clear();
        for (i, &v) in self.vertices.iter().enumerate() {
            let d = scratch.dists[i];
            if d <= PLANE_EPSILON {
                let idx = vertices.len();
                vertices.push(v);
                scratch.remap.push(Some(idx));
                if d >= -PLANE_EPSILON {
                    scratch.cap.push(idx);
                }
            } else {
                scratch.remap.push(None);
            }
        }

        scratch.edge_points.clear();
        let mut faces = Vec::with_capacity(self.faces.len() + 1);
        for face in &self.faces {
            let mut clipped = Vec::with_capacity(face.len() + 2);
            // Faces whose survivors all sit on the plane are absorbed by the cap
            let mut touches_interior = false;

            for k in 0..face.len() {
                let a = face[k];
                let b = face[(k + 1) % face.len()];
                let (da, db) = (scratch.dists[a], scratch.dists[b]);

                if let Some(na) = scratch.remap[a] {
                    clipped.push(na);
                    touches_interior |= da < -PLANE_EPSILON;
                }

                let crosses = (da < -PLANE_EPSILON && db > PLANE_EPSILON)
                    || (da > PLANE_EPSILON && db < -PLANE_EPSILON);
                if crosses {
                    let key = if a < b { (a, b) } else { (b, a) };
                    let idx = match scratch.edge_points.get(&key) {
                        Some(&idx) => idx,
                        None => {
                            // Interpolate from the lower index so both faces
                            // sharing the edge get the identical point
                            let (lo, hi) = key;
                            let (dlo, dhi) = (scratch.dists[lo], scratch.dists[hi]);
                            let t = dlo / (dlo - dhi);
                            let p = self.vertices[lo] + (self.vertices[hi] - self.vertices[lo]) * t;
                            let idx = vertices.len();
                            vertices.push(p);
                            scratch.edge_points.insert(key, idx);
                            scratch.cap.push(idx);
                            idx
                        }
                    };
                    clipped.push(idx);
                }
            }

            if clipped.len() >= 3 && touches_interior {
                faces.push(clipped);
            }
        }

        if scratch.cap.len() >= 3 {
            let mut cap = std::mem::take(&mut scratch.cap);
            order_loop(&vertices, &mut cap, plane.normal(), &mut scratch.angles);
            faces.push(cap.clone());
            scratch.cap = cap;
        }

        if faces.is_empty() {
            self.vertices.clear();
            self.faces.clear();
            return ClipOutcome::Emptied;
        }

        self.vertices = vertices;
        self.faces = faces;
        self.compact(&mut scratch.used);
        ClipOutcome::Clipped
    }

    /// Drop vertices no face references
    fn compact(&mut self, used: &mut Vec<Option<usize>>) {
        used.clear();
        used.resize(self.vertices.len(), None);
        for face in &self.faces {
            for &i in face {
                used[i] = Some(0);
            }
        }
        if used.iter().all(Option::is_some) {
            return;
        }

        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (old, slot) in used.iter_mut().enumerate() {
            if slot.is_some() {
                *slot = Some(vertices.len());
                vertices.push(self.vertices[old]);
            }
        }
        for face in &mut self.faces {
            for i in face.iter_mut() {
                if let Some(new) = used[*i] {
                    *i = new;
                }
            }
        }
        self.vertices = vertices;
    }
}

/// Sort a planar convex loop counter-clockwise around `normal`
fn order_loop(
    vertices: &[DVec3],
    loop_indices: &mut [usize],
    normal: DVec3,
    angles: &mut Vec<(usize, f64)>,
) {
    let centroid = loop_indices.iter().map(|&i| vertices[i]).sum::<DVec3>()
        / loop_indices.len() as f64;
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);

    angles.clear();
    angles.extend(loop_indices.iter().map(|&i| {
        let offset = vertices[i] - centroid;
        (i, offset.dot(v).atan2(offset.dot(u)))
    }));
    angles.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    for (slot, (i, _)) in loop_indices.iter_mut().zip(angles.iter()) {
        *slot = *i;
    }
}

/// Newell normal of a face loop
///
/// Points along the right-hand winding direction; its length is twice the
/// polygon's area.
pub fn face_normal(vertices: &[DVec3], face: &[usize]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for k in 0..face.len() {
        let a = vertices[face[k]];
        let b = vertices[face[(k + 1) % face.len()]];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Supporting plane of a face, oriented outward
///
/// Returns `None` for faces with (numerically) zero area.
pub fn face_plane(vertices: &[DVec3], face: &[usize]) -> Option<Plane> {
    let normal = face_normal(vertices, face);
    let length = normal.length();
    if length <= f64::EPSILON {
        return None;
    }
    let unit = normal / length;
    Some(Plane::from_unit(unit, face_centroid(vertices, face).dot(unit)))
}

/// Mean of a face's vertices
pub fn face_centroid(vertices: &[DVec3], face: &[usize]) -> DVec3 {
    if face.is_empty() {
        return DVec3::ZERO;
    }
    face.iter().map(|&i| vertices[i]).sum::<DVec3>() / face.len() as f64
}

/// Area of a planar face loop
pub fn polygon_area(vertices: &[DVec3], face: &[usize]) -> f64 {
    face_normal(vertices, face).length() * 0.5
}

/// Whether `point` is on the inner side of every face (with tolerance)
pub fn polytope_contains(vertices: &[DVec3], faces: &[Vec<usize>], point: DVec3) -> bool {
    if faces.is_empty() {
        return false;
    }
    faces.iter().all(|face| {
        let normal = face_normal(vertices, face);
        let length = normal.length();
        if length <= f64::EPSILON {
            return true;
        }
        (point - vertices[face[0]]).dot(normal) <= PLANE_EPSILON * length
    })
}

/// Volume enclosed by outward-wound faces
///
/// Sums signed tetrahedra from the first vertex; returns 0 for empty input.
pub fn polytope_volume(vertices: &[DVec3], faces: &[Vec<usize>]) -> f64 {
    let Some(&origin) = vertices.first() else {
        return 0.0;
    };

    let mut six_volume = 0.0;
    for face in faces {
        if face.len() < 3 {
            continue;
        }
        let a = vertices[face[0]] - origin;
        for k in 1..face.len() - 1 {
            let b = vertices[face[k]] - origin;
            let c = vertices[face[k + 1]] - origin;
            six_volume += a.dot(b.cross(c));
        }
    }

    (six_volume / 6.0).max(0.0)
}
