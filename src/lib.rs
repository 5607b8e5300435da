//! Bounded 3D Voronoi shards
//!
//! Partitions a convex volume (an axis-aligned box cut by wall planes) into
//! Voronoi cells around moving particles, shrinks each cell into an inset
//! shell and flattens it into triangles for any renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use voronoi_shards::*;
//!
//! // One-shot tessellation
//! let region = BoundedRegion::cube(1.0).with_walls(tetra_walls());
//! let sites = [
//!     Site::new(0, DVec3::new(-0.1, 0.0, 0.0)),
//!     Site::new(1, DVec3::new(0.1, 0.2, 0.0)),
//! ];
//! let tessellation = build_cells(&region, &sites, 0.01).unwrap();
//! let triangles = triangulate(tessellation.shell(0).unwrap());
//! println!("Cell 0 has {} triangles", triangles.len() / 3);
//!
//! // Animated scene
//! let config = SceneConfigBuilder::new()
//!     .seed(42)
//!     .layout(ParticleLayout::Random { count: 30 })
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let mut scene = ShardScene::new(config);
//! scene.update(16.0);
//! let stats = scene.build_frame(0.0).unwrap();
//! println!("{} shards, {} triangles", stats.cells, stats.triangles);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree neighbour search for large site sets
//! - `serde`: Enables serialization support for configuration, regions and cells

// Modules
pub mod error;
pub mod geometry;
pub mod region;
pub mod cell;
pub mod generation;
pub mod particle;
pub mod shard;
pub mod mesh;
pub mod config;
pub mod scene;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{ShardError, Result};
pub use geometry::{ConvexPolytope, Plane, PLANE_EPSILON, DEGENERATE_VOLUME};
pub use region::{BoundedRegion, VolumeTester, tetra_walls};
pub use cell::{CellPolytope, InsetCellPolytope, Site};
pub use generation::{build_cells, inset_cell, CellBuilder, NeighborSearch, Tessellation};
pub use particle::{MotionParams, Particle};
pub use shard::{HeaveParams, Shard};
pub use mesh::{triangulate, append_triangles, ShardMesh, MeshPool, ColorMapper, PaletteColorMapper, ShardColor};
pub use config::{SceneConfig, SceneConfigBuilder, WallPreset, ParticleLayout};
pub use scene::{ShardScene, FrameStats, heave_wave};

#[cfg(feature = "spatial-index")]
pub use spatial::SiteIndex;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
