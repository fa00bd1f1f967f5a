//! # Height Field
//!
//! Stateless elevation function used to shape the initial terrain.
//!
//! ## Determinism Guarantee
//!
//! The field has no seed and no state. The same `(x, z)` always yields the
//! same elevation, so two grids with the same dimensions generate identical
//! terrain.

/// Source of continuous elevation values, sampled in world units.
pub trait HeightSource {
    /// Returns the elevation at world position `(x, z)`, in voxel units.
    fn sample(&self, x: f32, z: f32) -> f32;
}

/// Layered sine/cosine field producing rolling hills.
///
/// `height(x, z) = sin(0.22x)·cos(0.18z)·2.5 + sin(0.3(x+z))·1.2 + cos(0.12z)·1.6 + 3`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeightField;

impl HeightField {
    /// Evaluates the field at `(x, z)`.
    #[inline]
    #[must_use]
    pub fn sample(x: f32, z: f32) -> f32 {
        let swell = (x * 0.22).sin() * (z * 0.18).cos() * 2.5;
        let diagonal = ((x + z) * 0.3).sin() * 1.2;
        let ridge = (z * 0.12).cos() * 1.6;
        swell + diagonal + ridge + 3.0
    }
}

impl HeightSource for HeightField {
    #[inline]
    fn sample(&self, x: f32, z: f32) -> f32 {
        Self::sample(x, z)
    }
}

/// Column height in whole voxels: clamped to `[1, max_height]` then floored.
///
/// NaN samples collapse to the minimum of one voxel.
#[inline]
#[must_use]
pub fn column_height(sample: f32, max_height: u32) -> u32 {
    if sample.is_nan() {
        return 1;
    }
    sample.clamp(1.0, max_height.max(1) as f32).floor() as u32
}
