//! Error types for shard tessellation

use std::fmt;

use glam::DVec3;

/// Errors that can occur while configuring a scene or building cells
///
/// Degenerate cells and empty regions are not errors: they come back as
/// valid, near-empty results. Only malformed input is reported here.
#[derive(Debug, Clone, PartialEq)]
pub enum ShardError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// A plane, site or distance is not usable as geometry (zero normal, NaN, ...)
    InvalidGeometry(String),
    /// A site lies outside the region's bounding box
    SiteOutsideRegion {
        /// Identifier of the offending site
        id: usize,
        /// Its position
        position: DVec3,
    },
}

impl fmt::Display for ShardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            ShardError::InvalidGeometry(msg) => write!(f, "invalid geometry: {}", msg),
            ShardError::SiteOutsideRegion { id, position } => write!(
                f,
                "site {} at ({}, {}, {}) lies outside the region bounds",
                id, position.x, position.y, position.z
            ),
        }
    }
}

impl std::error::Error for ShardError {}

/// Result type alias for shard operations
pub type Result<T> = std::result::Result<T, ShardError>;
