//! # Terrain Mesh
//!
//! Per-voxel instance data for the rendering collaborator.
//!
//! ## Rebuild Model
//!
//! Every rebuild enumerates the whole filled set and emits one instance per
//! solid cell. The finished mesh replaces the previous one behind an `Arc`,
//! so a renderer holding a snapshot never sees a half-built mesh.
//!
//! ```text
//! filled set ──► MeshBuilder::rebuild ──► Arc<TerrainMesh> (generation N+1)
//!                                              │
//!                         renderer: mesh() ────┘  upload if generation changed
//! ```

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use ironclad_shared::Vec3;

use crate::grid::VoxelGrid;

/// Color band a voxel falls into, by lattice height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HeightBand {
    /// Top two layers.
    Vegetation = 0,
    /// The two layers below vegetation.
    Soil = 1,
    /// Everything lower.
    Rock = 2,
}

impl HeightBand {
    /// Classifies layer `y` of a grid that is `max_height` voxels tall.
    ///
    /// Vegetation from `max_height - 2` up, soil from `max_height - 4` up,
    /// rock below.
    #[inline]
    #[must_use]
    pub fn classify(y: i32, max_height: u32) -> Self {
        let top = i64::from(max_height);
        let y = i64::from(y);
        if y >= top - 2 {
            Self::Vegetation
        } else if y >= top - 4 {
            Self::Soil
        } else {
            Self::Rock
        }
    }

    /// Linear RGBA tint for this band.
    #[inline]
    #[must_use]
    pub fn color(self) -> [f32; 4] {
        match self {
            Self::Vegetation => rgb(0x3c, 0x4e, 0x2c),
            Self::Soil => rgb(0x6f, 0x6a, 0x4d),
            Self::Rock => rgb(0x2b, 0x2f, 0x2f),
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Per-instance data sent to the GPU.
///
/// One instance is one unit cube scaled by the voxel size.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VoxelInstance {
    /// World position of the cell center (xyz) + scale packed in w.
    pub position_scale: [f32; 4],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

impl VoxelInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates an instance at a cell center.
    #[inline]
    #[must_use]
    pub const fn new(center: Vec3, scale: f32, color: [f32; 4]) -> Self {
        Self {
            position_scale: [center.x, center.y, center.z, scale],
            color,
        }
    }

    /// World position of the cell center.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        let [x, y, z, _] = self.position_scale;
        Vec3::new(x, y, z)
    }
}

/// Immutable snapshot of the terrain's renderable instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    /// Rebuild counter. 0 means nothing has been built yet.
    pub generation: u64,
    /// One instance per filled cell, in unspecified order.
    pub instances: Vec<VoxelInstance>,
}

impl TerrainMesh {
    /// Number of instances.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the mesh has no instances.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bytes for a GPU instance buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Derives [`TerrainMesh`] snapshots from grid occupancy.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    current: Arc<TerrainMesh>,
}

impl MeshBuilder {
    /// Creates a builder holding an empty generation-0 mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current mesh with one built from `grid`.
    ///
    /// Cost is linear in the number of filled cells.
    pub fn rebuild(&mut self, grid: &VoxelGrid) -> Arc<TerrainMesh> {
        let max_height = grid.max_height();
        let scale = grid.voxel_size();

        let mut instances = Vec::with_capacity(grid.filled_count());
        instances.extend(grid.iter_filled().map(|cell| {
            let center = grid.voxel_to_world(cell.x, cell.y, cell.z);
            let color = HeightBand::classify(cell.y, max_height).color();
            VoxelInstance::new(center, scale, color)
        }));

        self.current = Arc::new(TerrainMesh {
            generation: self.current.generation + 1,
            instances,
        });
        Arc::clone(&self.current)
    }

    /// The most recently built mesh.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Arc<TerrainMesh> {
        Arc::clone(&self.current)
    }

    /// Generation of the most recently built mesh.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.current.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    #[test]
    fn test_instance_size() {
        // Two vec4s
        assert_eq!(VoxelInstance::SIZE, 32);
    }

    #[test]
    fn test_height_bands() {
        assert_eq!(HeightBand::classify(7, 8), HeightBand::Vegetation);
        assert_eq!(HeightBand::classify(6, 8), HeightBand::Vegetation);
        assert_eq!(HeightBand::classify(5, 8), HeightBand::Soil);
        assert_eq!(HeightBand::classify(4, 8), HeightBand::Soil);
        assert_eq!(HeightBand::classify(3, 8), HeightBand::Rock);
        assert_eq!(HeightBand::classify(0, 8), HeightBand::Rock);
    }

    #[test]
    fn test_height_bands_short_grid() {
        // Boundaries fall below zero, so every layer is vegetation or soil.
        assert_eq!(HeightBand::classify(0, 2), HeightBand::Vegetation);
        assert_eq!(HeightBand::classify(0, 3), HeightBand::Soil);
        assert_eq!(HeightBand::classify(1, 3), HeightBand::Vegetation);
    }

    #[test]
    fn test_rebuild_emits_one_instance_per_filled_cell() {
        let mut grid = VoxelGrid::new(&GridConfig::new(8, 8, 0.5)).unwrap();
        grid.fill(0, 0, 0);
        grid.fill(3, 7, 2);
        grid.fill(3, 5, 2);

        let mut builder = MeshBuilder::new();
        assert_eq!(builder.generation(), 0);
        let mesh = builder.rebuild(&grid);

        assert_eq!(mesh.generation, 1);
        assert_eq!(mesh.len(), grid.filled_count());
        assert_eq!(mesh.as_bytes().len(), 3 * VoxelInstance::SIZE);

        let top = grid.voxel_to_world(3, 7, 2);
        let inst = mesh
            .instances
            .iter()
            .find(|i| i.position() == top)
            .expect("instance for (3, 7, 2)");
        assert_eq!(inst.color, HeightBand::Vegetation.color());
        assert_eq!(inst.position_scale[3], 0.5);
    }

    #[test]
    fn test_old_snapshot_survives_rebuild() {
        let mut grid = VoxelGrid::new(&GridConfig::new(4, 4, 1.0)).unwrap();
        grid.fill(1, 1, 1);

        let mut builder = MeshBuilder::new();
        let first = builder.rebuild(&grid);

        grid.clear(1, 1, 1);
        let second = builder.rebuild(&grid);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(second.generation, 2);
        assert_eq!(builder.current().generation, 2);
    }
}
