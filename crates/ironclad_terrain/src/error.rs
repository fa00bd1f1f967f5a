//! # Terrain Error Types
//!
//! Only construction and configuration can fail. Queries and edits on a
//! built grid degrade to no-ops instead of returning errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or validating terrain.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// Grid width/depth or height is zero.
    #[error("invalid grid dimensions: size {size}, max height {max_height}")]
    InvalidDimensions {
        /// Requested width/depth in voxels.
        size: u32,
        /// Requested height in voxels.
        max_height: u32,
    },

    /// Voxel edge length is zero, negative or not finite.
    #[error("invalid voxel size: {0}")]
    InvalidVoxelSize(f32),

    /// The lattice has more cells than a packed key can address.
    #[error("grid too large: {cells} cells exceeds packed key range")]
    GridTooLarge {
        /// Total number of cells requested.
        cells: u64,
    },

    /// A stored coordinate lies outside the declared bounds.
    #[error("occupancy invariant violated: voxel ({x}, {y}, {z}) is out of bounds")]
    InvariantViolation {
        /// X lattice coordinate.
        x: i64,
        /// Y lattice coordinate.
        y: i64,
        /// Z lattice coordinate.
        z: i64,
    },

    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for terrain construction.
pub type TerrainResult<T> = Result<T, TerrainError>;
