//! # IRONCLAD Terrain
//!
//! Destructible voxel terrain for a single fixed-size battlefield.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: The base terrain depends only on grid dimensions
//! 2. **Single owner**: One [`VoxelTerrain`] owns occupancy; collaborators get it passed in
//! 3. **Shrink only**: After generation, cells are only ever removed
//! 4. **No-op on bad input**: Queries and edits outside the grid do nothing
//!
//! ## Core Components
//!
//! - `HeightField`: Stateless elevation function
//! - `VoxelGrid`: Occupancy lattice with world/voxel mapping
//! - `TerrainGenerator`: Heightmap extrusion into voxels
//! - `MeshBuilder`: Per-voxel instances, colored by height band
//! - `PropPlacer`: Seeded scatter of trees, rocks and grass
//! - `destruction` / `raycast`: Sphere carving and projectile hits
//!
//! ## Example
//!
//! ```rust,ignore
//! use ironclad_terrain::{TerrainConfig, VoxelTerrain};
//! use ironclad_shared::Vec3;
//!
//! let mut terrain = VoxelTerrain::new(TerrainConfig::default())?;
//! terrain.generate();
//!
//! let ground = terrain.surface_height(3.0, -7.0);
//! if let Some(hit) = terrain.check_projectile_hit(Vec3::new(0.0, 12.0, 0.0), Vec3::new(4.0, 0.0, 4.0)) {
//!     terrain.remove_sphere(hit, 2.0);
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod destruction;
pub mod error;
pub mod generator;
pub mod grid;
pub mod height_field;
pub mod mesh;
pub mod props;
pub mod raycast;
pub mod terrain;

pub use config::{GridConfig, PropConfig, TerrainConfig};
pub use error::{TerrainError, TerrainResult};
pub use generator::{GenerationStats, TerrainGenerator};
pub use grid::{VoxelCoord, VoxelGrid};
pub use height_field::{HeightField, HeightSource};
pub use mesh::{HeightBand, MeshBuilder, TerrainMesh, VoxelInstance};
pub use props::{Prop, PropKind, PropLayout, PropPlacer};
pub use raycast::{RayHit, RAY_STEP};
pub use terrain::VoxelTerrain;
