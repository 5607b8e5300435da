//! Triangle output for shards
//!
//! Cells and shards are flattened into triangle soups: faces that are already
//! triangles are emitted as-is, larger faces are fanned from their centroid.
//! [`ShardMesh`] converts a soup into renderer-ready `f32` buffers and
//! [`MeshPool`] keeps one of those per particle across frames.

mod colors;

pub use colors::{
    ColorMapper, Hsl, PaletteColorMapper, ShardColor, UniformColorMapper, DEFAULT_PALETTE,
};

use glam::{DVec3, Vec3};

use crate::cell::CellPolytope;
use crate::geometry::face_centroid;

/// Triangulate a cell into flat vertex triples
///
/// Degenerate cells produce no triangles.
///
/// # Example
///
/// ```
/// use voronoi_shards::{build_cells, triangulate, BoundedRegion, Site, DVec3};
///
/// let region = BoundedRegion::cube(1.0);
/// let tessellation = build_cells(&region, &[Site::new(0, DVec3::ZERO)], 0.0).unwrap();
///
/// let triangles = triangulate(&tessellation.cells[0]);
/// // Six square faces, four fan triangles each
/// assert_eq!(triangles.len(), 6 * 4 * 3);
/// ```
pub fn triangulate(cell: &CellPolytope) -> Vec<DVec3> {
    let mut out = Vec::new();
    append_triangles(cell, &mut out);
    out
}

/// Append a cell's triangles to `out`
pub fn append_triangles(cell: &CellPolytope, out: &mut Vec<DVec3>) {
    if cell.is_degenerate() {
        return;
    }
    append_face_fans(&cell.vertices, &cell.faces, out);
}

/// Append triangles for arbitrary face loops
///
/// Each output triangle keeps the winding of its face.
pub fn append_face_fans(vertices: &[DVec3], faces: &[Vec<usize>], out: &mut Vec<DVec3>) {
    for face in faces {
        match face.len() {
            0..=2 => {}
            3 => out.extend(face.iter().map(|&i| vertices[i])),
            n => {
                let center = face_centroid(vertices, face);
                for k in 0..n {
                    out.push(center);
                    out.push(vertices[face[k]]);
                    out.push(vertices[face[(k + 1) % n]]);
                }
            }
        }
    }
}

/// Renderer-ready buffers for one shard
///
/// Non-indexed: every three positions form one triangle, and every vertex
/// carries its triangle's flat normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardMesh {
    /// Particle id this slot belongs to
    pub id: usize,
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Flat per-triangle normals, repeated for each vertex
    pub normals: Vec<[f32; 3]>,
    /// Shard color
    pub color: ShardColor,
    /// Whether the slot holds a shard this frame
    pub active: bool,
}

impl ShardMesh {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Clear the buffers and mark the slot inactive, keeping capacity
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.active = false;
    }

    /// Replace the buffers with a triangle soup
    ///
    /// With `mirror_z` the z axis is negated for a renderer with the opposite
    /// handedness, and each triangle's last two vertices are swapped so its
    /// front face still points outward.
    pub fn fill(&mut self, triangles: &[DVec3], color: ShardColor, mirror_z: bool) {
        self.clear();
        self.color = color;
        self.active = true;
        self.positions.reserve(triangles.len());
        self.normals.reserve(triangles.len());

        for tri in triangles.chunks_exact(3) {
            let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
            let (a, b, c) = if mirror_z {
                std::mem::swap(&mut b, &mut c);
                (flip_z(a), flip_z(b), flip_z(c))
            } else {
                (a, b, c)
            };

            let (a, b, c) = (a.as_vec3(), b.as_vec3(), c.as_vec3());
            let normal = triangle_normal(a, b, c).to_array();
            for v in [a, b, c] {
                self.positions.push(v.to_array());
                self.normals.push(normal);
            }
        }
    }
}

fn flip_z(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.y, -v.z)
}

/// One mesh slot per particle, reused across frames
#[derive(Debug, Clone, Default)]
pub struct MeshPool {
    slots: Vec<ShardMesh>,
}

impl MeshPool {
    /// Pool with `len` empty slots
    pub fn new(len: usize) -> Self {
        let mut pool = Self::default();
        pool.resize(len);
        pool
    }

    /// Grow or shrink to exactly `len` slots
    ///
    /// Slot `i` always has id `i`. Existing slots keep their buffers.
    pub fn resize(&mut self, len: usize) {
        self.slots.truncate(len);
        let start = self.slots.len();
        self.slots.extend((start..len).map(|id| ShardMesh {
            id,
            ..ShardMesh::default()
        }));
    }

    /// Mark every slot inactive before refilling
    pub fn begin_frame(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Slot for particle `id`
    pub fn slot_mut(&mut self, id: usize) -> Option<&mut ShardMesh> {
        self.slots.get_mut(id)
    }

    /// Slots that hold a shard this frame
    pub fn active(&self) -> impl Iterator<Item = &ShardMesh> + '_ {
        self.slots.iter().filter(|slot| slot.active)
    }

    /// All slots, active or not
    pub fn slots(&self) -> &[ShardMesh] {
        &self.slots
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Unit normal of the triangle `(a, b, c)` by the right-hand rule
pub(crate) fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
