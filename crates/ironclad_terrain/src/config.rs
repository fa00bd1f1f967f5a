//! # Terrain Configuration
//!
//! Loaded once at startup from TOML. Every section has defaults, so a file
//! only needs the keys it wants to override:
//!
//! ```toml
//! [grid]
//! size = 96
//! voxel_size = 0.5
//!
//! [props]
//! seed = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};

/// Lattice dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width and depth of the square lattice, in voxels.
    pub size: u32,
    /// Height of the lattice, in voxels.
    pub max_height: u32,
    /// Edge length of one voxel, in world units.
    pub voxel_size: f32,
}

impl GridConfig {
    /// Creates a grid config with explicit dimensions.
    #[must_use]
    pub const fn new(size: u32, max_height: u32, voxel_size: f32) -> Self {
        Self {
            size,
            max_height,
            voxel_size,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(64, 8, 1.0)
    }
}

/// Prop scatter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    /// Seed for the prop RNG. Terrain shape does not depend on it.
    pub seed: u64,
    /// Skip prop placement entirely when false.
    pub enabled: bool,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            seed: 0x1A0C_1AD5,
            enabled: true,
        }
    }
}

/// Complete terrain configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Lattice dimensions.
    pub grid: GridConfig,
    /// Prop scatter settings.
    pub props: PropConfig,
}

impl TerrainConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigParse`] if the text is not valid for this schema.
    pub fn from_toml_str(text: &str) -> TerrainResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigIo`] if the file cannot be read and
    /// [`TerrainError::ConfigParse`] if its contents are invalid.
    pub fn load(path: &Path) -> TerrainResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
