//! # Projectile Raycast
//!
//! Marches a segment through the grid in fixed steps and reports the first
//! sample that lands in a solid cell.
//!
//! This is point sampling, not voxel traversal. A wall thinner than
//! [`RAY_STEP`] can be stepped over. The last step may overshoot `end` by up
//! to one step.

use ironclad_shared::Vec3;

use crate::grid::{VoxelCoord, VoxelGrid};

/// Distance between samples, in world units.
pub const RAY_STEP: f32 = 0.25;

/// First solid sample along a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Sampled world position inside the solid cell.
    pub point: Vec3,
    /// The solid cell.
    pub voxel: VoxelCoord,
    /// Distance from the segment start to `point`.
    pub distance: f32,
}

/// Samples `start → end` every [`RAY_STEP`] and returns the first solid hit.
///
/// A zero-length or non-finite segment returns `None` without sampling.
/// Only the samples that can fall inside the grid's bounds are visited, so
/// the cost is bounded by the grid's extent rather than the segment length.
#[must_use]
pub fn march(grid: &VoxelGrid, start: Vec3, end: Vec3) -> Option<RayHit> {
    let delta = end - start;
    let length = delta.length();
    if !length.is_finite() || length <= 0.0 {
        return None;
    }

    let dir = delta * (1.0 / length);
    let steps = (f64::from(length) / f64::from(RAY_STEP)).ceil() as u64;
    let (first, last) = sample_window(grid, start, dir, steps)?;

    (first..=last).find_map(|i| {
        let distance = i as f32 * RAY_STEP;
        let point = start + dir * distance;
        let voxel = grid.world_to_voxel(point);
        grid.is_filled(voxel.x, voxel.y, voxel.z).then_some(RayHit {
            point,
            voxel,
            distance,
        })
    })
}

/// Range of sample indices in `0..=steps` whose points may lie inside the
/// grid's world bounds, or `None` if the ray misses them entirely.
///
/// The ray is clipped against the bounds slab by slab in `f64`. The window is
/// padded so that `f32` rounding of far sample positions cannot push a sample
/// that lands inside the grid out of it.
fn sample_window(grid: &VoxelGrid, start: Vec3, dir: Vec3, steps: u64) -> Option<(u64, u64)> {
    let half = f64::from(grid.half_world());
    let top = f64::from(grid.max_height()) * f64::from(grid.voxel_size());
    let slabs = [
        (start.x, dir.x, -half, half),
        (start.y, dir.y, 0.0, top),
        (start.z, dir.z, -half, half),
    ];

    let step = f64::from(RAY_STEP);
    let mut enter = 0.0_f64;
    let mut exit = steps as f64 * step;

    for (origin, d, low, high) in slabs {
        let (origin, d) = (f64::from(origin), f64::from(d));
        if d == 0.0 {
            if origin < low || origin >= high {
                return None;
            }
            continue;
        }
        let (a, b) = ((low - origin) / d, (high - origin) / d);
        enter = enter.max(a.min(b));
        exit = exit.min(a.max(b));
    }

    let slack = 2.0 + (exit.abs() * 1e-6 / step).ceil();
    let first = ((enter / step).floor() - slack).max(0.0);
    let last = ((exit / step).ceil() + slack).min(steps as f64);
    if first > last {
        return None;
    }
    Some((first as u64, last as u64))
}

/// Impact point of a projectile moving from `start` to `end` this frame.
#[inline]
#[must_use]
pub fn check_projectile_hit(grid: &VoxelGrid, start: Vec3, end: Vec3) -> Option<Vec3> {
    march(grid, start, end).map(|hit| hit.point)
}
