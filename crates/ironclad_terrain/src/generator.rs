//! # Terrain Generator
//!
//! One-shot population of a [`VoxelGrid`] from a height source.
//!
//! Every column is sampled once at its world-space center and extruded from
//! `y = 0` up to its height. The result has no caves or overhangs.

use tracing::debug;

use crate::grid::VoxelGrid;
use crate::height_field::{column_height, HeightField, HeightSource};

/// Summary of one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Columns sampled.
    pub columns: usize,
    /// Cells filled.
    pub filled: usize,
    /// Lowest column height, in voxels.
    pub min_height: u32,
    /// Highest column height, in voxels.
    pub max_height: u32,
}

/// Heightmap extruder.
#[derive(Clone, Debug, Default)]
pub struct TerrainGenerator<S = HeightField> {
    source: S,
}

impl TerrainGenerator<HeightField> {
    /// Creates a generator using the default [`HeightField`].
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            source: HeightField,
        }
    }
}

impl<S: HeightSource> TerrainGenerator<S> {
    /// Creates a generator over a custom height source.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Clears `grid` and fills it from the height source.
    ///
    /// Deterministic: the same source and grid dimensions always produce the
    /// same set of filled cells.
    pub fn generate(&self, grid: &mut VoxelGrid) -> GenerationStats {
        grid.reset();

        let size = grid.size() as i32;
        let max_height = grid.max_height();
        let mut stats = GenerationStats {
            min_height: u32::MAX,
            ..GenerationStats::default()
        };

        for z in 0..size {
            for x in 0..size {
                let center = grid.voxel_to_world(x, 0, z);
                let height = column_height(self.source.sample(center.x, center.z), max_height);
                grid.set_column_height(x, z, height);

                for y in 0..height as i32 {
                    grid.fill(x, y, z);
                }

                stats.columns += 1;
                stats.min_height = stats.min_height.min(height);
                stats.max_height = stats.max_height.max(height);
            }
        }

        stats.filled = grid.filled_count();
        if stats.columns == 0 {
            stats.min_height = 0;
        }

        debug!(
            "Generated {} columns, {} voxels (heights {}..={})",
            stats.columns, stats.filled, stats.min_height, stats.max_height
        );

        stats
    }
}
