//! # Voxel Terrain
//!
//! The terrain's outward face. Owns the grid, the current mesh and the prop
//! layout, and is the only writer of occupancy after generation.
//!
//! ```text
//! generate() ──► TerrainGenerator ──► MeshBuilder::rebuild ──► PropPlacer
//!
//! per projectile, per frame:
//!   check_projectile_hit(start, end) ──► Some(p) ──► remove_sphere(p, r)
//!                                                        │ removed > 0
//!                                                        ▼
//!                                              MeshBuilder::rebuild (once)
//! ```

use std::sync::Arc;

use ironclad_shared::Vec3;
use tracing::{debug, info};

use crate::config::{GridConfig, PropConfig, TerrainConfig};
use crate::destruction;
use crate::error::TerrainResult;
use crate::generator::{GenerationStats, TerrainGenerator};
use crate::grid::VoxelGrid;
use crate::height_field::HeightSource;
use crate::mesh::{MeshBuilder, TerrainMesh};
use crate::props::{PropLayout, PropPlacer};
use crate::raycast::{self, RayHit};

/// Destructible voxel terrain.
#[derive(Debug)]
pub struct VoxelTerrain {
    config: TerrainConfig,
    grid: VoxelGrid,
    mesher: MeshBuilder,
    props: PropLayout,
}

impl VoxelTerrain {
    /// Allocates an empty terrain. Call [`Self::generate`] before use.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid dimensions are invalid.
    pub fn new(config: TerrainConfig) -> TerrainResult<Self> {
        let grid = VoxelGrid::new(&config.grid)?;
        Ok(Self {
            config,
            grid,
            mesher: MeshBuilder::new(),
            props: PropLayout::default(),
        })
    }

    /// Wraps an already populated grid and builds its mesh. No props are placed.
    #[must_use]
    pub fn from_grid(grid: VoxelGrid) -> Self {
        let config = TerrainConfig {
            grid: GridConfig::new(grid.size(), grid.max_height(), grid.voxel_size()),
            props: PropConfig {
                enabled: false,
                ..PropConfig::default()
            },
        };

        let mut mesher = MeshBuilder::new();
        mesher.rebuild(&grid);
        Self {
            config,
            grid,
            mesher,
            props: PropLayout::default(),
        }
    }

    /// Generates terrain from the standard height field, builds the mesh
    /// and places props.
    pub fn generate(&mut self) -> GenerationStats {
        self.generate_with(&TerrainGenerator::standard())
    }

    /// Same as [`Self::generate`] with a custom generator.
    pub fn generate_with<S: HeightSource>(&mut self, generator: &TerrainGenerator<S>) -> GenerationStats {
        let stats = generator.generate(&mut self.grid);
        let mesh = self.mesher.rebuild(&self.grid);

        self.props = if self.config.props.enabled {
            PropPlacer::new(self.config.props.seed).place(&self.grid)
        } else {
            PropLayout::default()
        };

        info!(
            "Terrain ready: {}x{}x{} grid, {} voxels, {} instances, {} props",
            self.grid.size(),
            self.grid.max_height(),
            self.grid.size(),
            stats.filled,
            mesh.len(),
            self.props.len()
        );

        stats
    }

    /// World-space ground level at `(world_x, world_z)`; `0.0` off the grid.
    #[inline]
    #[must_use]
    pub fn surface_height(&self, world_x: f32, world_z: f32) -> f32 {
        self.grid.surface_height(world_x, world_z)
    }

    /// Carves a sphere out of the terrain.
    ///
    /// Returns the number of voxels removed. The mesh is rebuilt exactly once
    /// if that number is non-zero and left untouched otherwise.
    pub fn remove_sphere(&mut self, center: Vec3, radius: f32) -> usize {
        let removed = destruction::remove_sphere(&mut self.grid, center, radius);
        if removed > 0 {
            let mesh = self.mesher.rebuild(&self.grid);
            debug!(
                "Carved {} voxels at ({:.2}, {:.2}, {:.2}) r={:.2}, mesh generation {}",
                removed, center.x, center.y, center.z, radius, mesh.generation
            );
        }
        removed
    }

    /// First point where a projectile moving `start → end` enters solid terrain.
    #[inline]
    #[must_use]
    pub fn check_projectile_hit(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        raycast::check_projectile_hit(&self.grid, start, end)
    }

    /// Like [`Self::check_projectile_hit`] with the hit cell and distance.
    #[inline]
    #[must_use]
    pub fn raycast(&self, start: Vec3, end: Vec3) -> Option<RayHit> {
        raycast::march(&self.grid, start, end)
    }

    /// Snapshot of the current mesh for upload.
    #[inline]
    #[must_use]
    pub fn mesh(&self) -> Arc<TerrainMesh> {
        self.mesher.current()
    }

    /// Generation counter of the current mesh.
    #[inline]
    #[must_use]
    pub fn mesh_generation(&self) -> u64 {
        self.mesher.generation()
    }

    /// Props placed at generation time.
    #[inline]
    #[must_use]
    pub fn props(&self) -> &PropLayout {
        &self.props
    }

    /// Read access to occupancy.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Configuration this terrain was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PropKind;

    fn terrain(size: u32) -> VoxelTerrain {
        let config = TerrainConfig {
            grid: GridConfig::new(size, 8, 1.0),
            ..TerrainConfig::default()
        };
        let mut terrain = VoxelTerrain::new(config).unwrap();
        terrain.generate();
        terrain
    }

    #[test]
    fn test_generate_builds_mesh_and_props() {
        let t = terrain(20);
        assert_eq!(t.mesh_generation(), 1);
        assert_eq!(t.mesh().len(), t.grid().filled_count());
        assert_eq!(t.props().count(PropKind::Tree), 24);
    }

    #[test]
    fn test_props_disabled() {
        let config = TerrainConfig {
            grid: GridConfig::new(12, 8, 1.0),
            props: PropConfig {
                enabled: false,
                ..PropConfig::default()
            },
        };
        let mut t = VoxelTerrain::new(config).unwrap();
        t.generate();
        assert!(t.props().is_empty());
    }

    #[test]
    fn test_hit_then_carve_rebuilds_once() {
        let mut t = terrain(16);
        let start = Vec3::new(0.5, 20.0, 0.5);
        let end = Vec3::new(0.5, -1.0, 0.5);

        let hit = t.check_projectile_hit(start, end).expect("straight down hits ground");
        assert!((hit.y - t.surface_height(0.5, 0.5)).abs() <= 0.26);

        let removed = t.remove_sphere(hit, 1.5);
        assert!(removed > 0);
        assert_eq!(t.mesh_generation(), 2);
        assert_eq!(t.mesh().len(), t.grid().filled_count());
    }

    #[test]
    fn test_noop_edit_keeps_mesh() {
        let mut t = terrain(16);
        let before = t.mesh();

        assert_eq!(t.remove_sphere(Vec3::new(0.0, 30.0, 0.0), 2.0), 0);
        assert_eq!(t.remove_sphere(Vec3::new(0.0, 1.0, 0.0), 0.0), 0);

        assert_eq!(t.mesh_generation(), 1);
        assert!(Arc::ptr_eq(&before, &t.mesh()));
    }

    #[test]
    fn test_props_ignore_destruction() {
        let mut t = terrain(16);
        let props_before = t.props().clone();
        t.remove_sphere(Vec3::new(0.0, 2.0, 0.0), 4.0);
        assert_eq!(t.props(), &props_before);
    }

    #[test]
    fn test_from_grid() {
        let mut grid = VoxelGrid::new(&GridConfig::new(8, 8, 1.0)).unwrap();
        grid.fill(2, 2, 2);
        let t = VoxelTerrain::from_grid(grid);
        assert_eq!(t.mesh().len(), 1);
        assert_eq!(t.config().grid.size, 8);
        assert!(t.props().is_empty());
    }
}
