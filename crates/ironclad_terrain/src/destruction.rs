//! # Sphere Destruction
//!
//! Removes every solid cell whose center lies within a sphere.
//!
//! The candidate box is clipped on X and Z only. Each candidate column is
//! scanned over its full height and the exact distance test filters the
//! cells, so corners of the box outside the radius survive.

use ironclad_shared::Vec3;

use crate::grid::VoxelGrid;

/// Removes all filled cells with `distance(center_of_cell, center) <= radius`.
///
/// Returns the number of cells removed. A non-positive or non-finite radius,
/// a non-finite center, or a sphere that misses the grid removes nothing.
pub fn remove_sphere(grid: &mut VoxelGrid, center: Vec3, radius: f32) -> usize {
    if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
        return 0;
    }

    let reach = Vec3::new(radius, 0.0, radius);
    let low = grid.world_to_voxel(center - reach);
    let high = grid.world_to_voxel(center + reach);

    let last = grid.size() as i32 - 1;
    let (x0, x1) = (low.x.max(0), high.x.min(last));
    let (z0, z1) = (low.z.max(0), high.z.min(last));
    if x0 > x1 || z0 > z1 {
        return 0;
    }

    let radius_sq = radius * radius;
    let mut removed = 0;

    for x in x0..=x1 {
        for z in z0..=z1 {
            for y in 0..grid.max_height() as i32 {
                if !grid.is_filled(x, y, z) {
                    continue;
                }
                let cell = grid.voxel_to_world(x, y, z);
                if cell.distance_squared(center) <= radius_sq && grid.clear(x, y, z) {
                    removed += 1;
                }
            }
        }
    }

    removed
}
