//! # Voxel Grid
//!
//! Fixed-size occupancy lattice centered on the world origin.
//!
//! ## Layout
//!
//! The lattice is `size × max_height × size` cells (x, y, z). Each cell is a
//! cube of edge `voxel_size`. The grid spans `[-half_world, half_world)` on
//! X and Z and `[0, max_height * voxel_size)` on Y.
//!
//! ## Storage
//!
//! Occupancy is a hash set of packed `u32` keys, `(y * size + z) * size + x`.
//! The set is the single source of truth. The per-column heights recorded at
//! generation time are provenance only and go stale once terrain is carved.

use std::collections::HashSet;

use ironclad_shared::Vec3;

use crate::config::GridConfig;
use crate::error::{TerrainError, TerrainResult};

/// Integer lattice coordinate.
///
/// Signed so that [`VoxelGrid::world_to_voxel`] can return out-of-range
/// coordinates instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelCoord {
    /// X lattice coordinate.
    pub x: i32,
    /// Y lattice coordinate (up).
    pub y: i32,
    /// Z lattice coordinate.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Volumetric occupancy for the whole play area.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    size: u32,
    max_height: u32,
    voxel_size: f32,
    half_world: f32,
    /// Generated surface height per column, indexed `[z * size + x]`.
    columns: Vec<u32>,
    /// Packed keys of solid cells.
    filled: HashSet<u32>,
}

impl VoxelGrid {
    /// Allocates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero, the voxel size is not a
    /// positive finite number, or the cell count overflows a packed key.
    pub fn new(config: &GridConfig) -> TerrainResult<Self> {
        let GridConfig {
            size,
            max_height,
            voxel_size,
        } = *config;

        if size == 0 || max_height == 0 {
            return Err(TerrainError::InvalidDimensions { size, max_height });
        }
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(TerrainError::InvalidVoxelSize(voxel_size));
        }
        let cells = u64::from(size) * u64::from(size) * u64::from(max_height);
        if cells > u64::from(u32::MAX) {
            return Err(TerrainError::GridTooLarge { cells });
        }

        let columns = size as usize * size as usize;
        Ok(Self {
            size,
            max_height,
            voxel_size,
            half_world: size as f32 * voxel_size / 2.0,
            columns: vec![0; columns],
            filled: HashSet::with_capacity(columns * max_height as usize / 2),
        })
    }

    /// Width and depth in voxels.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Height in voxels.
    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Edge length of one voxel in world units.
    #[inline]
    #[must_use]
    pub const fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Half the world-space extent on X and Z.
    #[inline]
    #[must_use]
    pub const fn half_world(&self) -> f32 {
        self.half_world
    }

    /// Number of columns (`size²`).
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of solid cells.
    #[inline]
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }

    /// Returns true if the lattice coordinate is within bounds.
    #[inline]
    #[must_use]
    pub fn is_inside(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.size
            && (y as u32) < self.max_height
            && (z as u32) < self.size
    }

    /// Returns true if the cell is solid. Out-of-bounds cells are empty.
    #[inline]
    #[must_use]
    pub fn is_filled(&self, x: i32, y: i32, z: i32) -> bool {
        self.key(x, y, z)
            .is_some_and(|key| self.filled.contains(&key))
    }

    /// Marks a cell solid. Returns true if it was empty before.
    ///
    /// Out-of-bounds writes are ignored.
    pub fn fill(&mut self, x: i32, y: i32, z: i32) -> bool {
        match self.key(x, y, z) {
            Some(key) => self.filled.insert(key),
            None => false,
        }
    }

    /// Marks a cell empty. Returns true if it was solid before.
    ///
    /// Out-of-bounds writes are ignored.
    pub fn clear(&mut self, x: i32, y: i32, z: i32) -> bool {
        match self.key(x, y, z) {
            Some(key) => self.filled.remove(&key),
            None => false,
        }
    }

    /// Empties every cell and resets recorded column heights.
    pub fn reset(&mut self) {
        self.filled.clear();
        self.columns.fill(0);
    }

    /// Iterates over solid cells in unspecified order.
    pub fn iter_filled(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.filled.iter().map(|&key| self.unpack(key))
    }

    /// Maps a world position to the lattice cell containing it.
    ///
    /// Never fails. Positions outside the grid, and non-finite components,
    /// map to out-of-range coordinates, so check [`Self::is_inside`] before
    /// using the result.
    #[inline]
    #[must_use]
    pub fn world_to_voxel(&self, p: Vec3) -> VoxelCoord {
        VoxelCoord {
            x: lattice((p.x + self.half_world) / self.voxel_size),
            y: lattice(p.y / self.voxel_size),
            z: lattice((p.z + self.half_world) / self.voxel_size),
        }
    }

    /// World-space center of a lattice cell.
    #[inline]
    #[must_use]
    pub fn voxel_to_world(&self, x: i32, y: i32, z: i32) -> Vec3 {
        Vec3::new(
            (x as f32 + 0.5) * self.voxel_size - self.half_world,
            (y as f32 + 0.5) * self.voxel_size,
            (z as f32 + 0.5) * self.voxel_size - self.half_world,
        )
    }

    /// World-space ground level at `(world_x, world_z)`.
    ///
    /// Scans the column top-down for the first solid cell and returns the
    /// height of its top face. Empty or out-of-range columns, and non-finite
    /// positions, return `0.0`.
    #[must_use]
    pub fn surface_height(&self, world_x: f32, world_z: f32) -> f32 {
        if !world_x.is_finite() || !world_z.is_finite() {
            return 0.0;
        }
        let cell = self.world_to_voxel(Vec3::new(world_x, 0.0, world_z));
        if !self.is_inside(cell.x, 0, cell.z) {
            return 0.0;
        }
        (0..self.max_height as i32)
            .rev()
            .find(|&y| self.is_filled(cell.x, y, cell.z))
            .map_or(0.0, |y| (y + 1) as f32 * self.voxel_size)
    }

    /// Height recorded for a column at generation time, in voxels.
    ///
    /// Not updated by destruction. Out-of-range columns return 0.
    #[must_use]
    pub fn column_height(&self, x: i32, z: i32) -> u32 {
        self.column_index(x, z).map_or(0, |i| self.columns[i])
    }

    /// Records the generated height of a column.
    pub fn set_column_height(&mut self, x: i32, z: i32, height: u32) {
        if let Some(i) = self.column_index(x, z) {
            self.columns[i] = height;
        }
    }

    /// Verifies that every stored key decodes to an in-bounds coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvariantViolation`] naming the first bad cell.
    pub fn check_invariants(&self) -> TerrainResult<()> {
        let cells = self.size * self.size * self.max_height;
        match self.filled.iter().find(|&&key| key >= cells) {
            Some(&key) => {
                let VoxelCoord { x, y, z } = self.unpack(key);
                Err(TerrainError::InvariantViolation {
                    x: i64::from(x),
                    y: i64::from(y),
                    z: i64::from(z),
                })
            }
            None => Ok(()),
        }
    }

    #[inline]
    fn key(&self, x: i32, y: i32, z: i32) -> Option<u32> {
        if !self.is_inside(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as u32, y as u32, z as u32);
        Some((y * self.size + z) * self.size + x)
    }

    #[inline]
    fn unpack(&self, key: u32) -> VoxelCoord {
        let x = key % self.size;
        let rest = key / self.size;
        let z = rest % self.size;
        let y = rest / self.size;
        VoxelCoord::new(x as i32, y as i32, z as i32)
    }

    #[inline]
    fn column_index(&self, x: i32, z: i32) -> Option<usize> {
        if self.is_inside(x, 0, z) {
            Some(z as usize * self.size as usize + x as usize)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_raw_key(&mut self, key: u32) {
        self.filled.insert(key);
    }
}

/// Floors a lattice-space value. NaN lands out of range instead of at 0.
#[inline]
fn lattice(v: f32) -> i32 {
    if v.is_nan() {
        i32::MIN
    } else {
        v.floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: u32, max_height: u32, voxel_size: f32) -> VoxelGrid {
        VoxelGrid::new(&GridConfig::new(size, max_height, voxel_size)).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            VoxelGrid::new(&GridConfig::new(0, 8, 1.0)),
            Err(TerrainError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            VoxelGrid::new(&GridConfig::new(8, 0, 1.0)),
            Err(TerrainError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            VoxelGrid::new(&GridConfig::new(8, 8, 0.0)),
            Err(TerrainError::InvalidVoxelSize(_))
        ));
        assert!(matches!(
            VoxelGrid::new(&GridConfig::new(8, 8, f32::NAN)),
            Err(TerrainError::InvalidVoxelSize(_))
        ));
        assert!(matches!(
            VoxelGrid::new(&GridConfig::new(100_000, 1_000, 1.0)),
            Err(TerrainError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_bounds() {
        let g = grid(16, 8, 1.0);
        assert!(g.is_inside(0, 0, 0));
        assert!(g.is_inside(15, 7, 15));
        assert!(!g.is_inside(16, 0, 0));
        assert!(!g.is_inside(0, 8, 0));
        assert!(!g.is_inside(0, 0, -1));
    }

    #[test]
    fn test_fill_and_clear() {
        let mut g = grid(16, 8, 1.0);
        assert!(g.fill(3, 4, 5));
        assert!(!g.fill(3, 4, 5), "second fill is not a change");
        assert!(g.is_filled(3, 4, 5));
        assert!(!g.is_filled(5, 4, 3));
        assert_eq!(g.filled_count(), 1);

        assert!(g.clear(3, 4, 5));
        assert!(!g.clear(3, 4, 5));
        assert_eq!(g.filled_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut g = grid(16, 8, 1.0);
        assert!(!g.fill(-1, 0, 0));
        assert!(!g.fill(0, 8, 0));
        assert!(!g.is_filled(100, 100, 100));
        assert_eq!(g.filled_count(), 0);
    }

    #[test]
    fn test_iter_filled_unpacks_keys() {
        let mut g = grid(16, 8, 1.0);
        g.fill(1, 2, 3);
        g.fill(15, 7, 0);
        let mut cells: Vec<_> = g.iter_filled().collect();
        cells.sort_by_key(|c| (c.x, c.y, c.z));
        assert_eq!(cells, vec![VoxelCoord::new(1, 2, 3), VoxelCoord::new(15, 7, 0)]);
    }

    #[test]
    fn test_coordinate_round_trip() {
        let g = grid(32, 8, 0.5);
        for z in 0..32 {
            for y in 0..8 {
                for x in 0..32 {
                    let center = g.voxel_to_world(x, y, z);
                    assert_eq!(g.world_to_voxel(center), VoxelCoord::new(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_world_point_maps_within_half_cell() {
        let g = grid(32, 8, 0.5);
        let p = Vec3::new(-3.1, 1.2, 7.4);
        let c = g.world_to_voxel(p);
        assert!(g.is_inside(c.x, c.y, c.z));
        let center = g.voxel_to_world(c.x, c.y, c.z);
        let half = g.voxel_size() / 2.0;
        assert!((center.x - p.x).abs() <= half);
        assert!((center.y - p.y).abs() <= half);
        assert!((center.z - p.z).abs() <= half);
    }

    #[test]
    fn test_world_to_voxel_out_of_range() {
        let g = grid(16, 8, 1.0);
        let c = g.world_to_voxel(Vec3::new(-100.0, -1.0, 100.0));
        assert!(!g.is_inside(c.x, c.y, c.z));
        assert_eq!(c.y, -1);
    }

    #[test]
    fn test_surface_height() {
        let mut g = grid(16, 8, 1.0);
        for y in 0..5 {
            g.fill(4, y, 6);
        }
        let center = g.voxel_to_world(4, 0, 6);
        assert_eq!(g.surface_height(center.x, center.z), 5.0);

        let empty = g.voxel_to_world(5, 0, 6);
        assert_eq!(g.surface_height(empty.x, empty.z), 0.0);

        assert_eq!(g.surface_height(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_surface_height_non_finite() {
        let mut g = grid(16, 8, 1.0);
        // Column (0, 0) is where a NaN would land if it were cast straight to i32.
        for y in 0..4 {
            g.fill(0, y, 0);
        }
        let corner = g.voxel_to_world(0, 0, 0);
        assert_eq!(g.surface_height(corner.x, corner.z), 4.0);

        assert_eq!(g.surface_height(f32::NAN, f32::NAN), 0.0);
        assert_eq!(g.surface_height(f32::NAN, corner.z), 0.0);
        assert_eq!(g.surface_height(corner.x, f32::INFINITY), 0.0);
        assert_eq!(g.surface_height(f32::NEG_INFINITY, corner.z), 0.0);

        let cell = g.world_to_voxel(Vec3::new(f32::NAN, 0.5, f32::NAN));
        assert!(!g.is_inside(cell.x, cell.y, cell.z));
        assert!(!g.is_filled(cell.x, cell.y, cell.z));
    }

    #[test]
    fn test_surface_height_sees_overhang_top() {
        let mut g = grid(16, 8, 0.5);
        g.fill(2, 1, 2);
        g.fill(2, 6, 2);
        let center = g.voxel_to_world(2, 0, 2);
        assert_eq!(g.surface_height(center.x, center.z), 3.5);
    }

    #[test]
    fn test_column_heights() {
        let mut g = grid(8, 8, 1.0);
        g.set_column_height(3, 4, 6);
        assert_eq!(g.column_height(3, 4), 6);
        assert_eq!(g.column_height(4, 3), 0);
        assert_eq!(g.column_height(-1, 0), 0);
        g.reset();
        assert_eq!(g.column_height(3, 4), 0);
    }

    #[test]
    fn test_invariant_check_catches_bad_key() {
        let mut g = grid(4, 4, 1.0);
        g.fill(1, 1, 1);
        assert!(g.check_invariants().is_ok());

        g.insert_raw_key(4 * 4 * 4);
        assert!(matches!(
            g.check_invariants(),
            Err(TerrainError::InvariantViolation { y: 4, .. })
        ));
    }
}
