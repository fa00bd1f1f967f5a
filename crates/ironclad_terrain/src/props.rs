//! # Prop Placement
//!
//! Scatters trees, rocks and grass onto the generated surface.
//!
//! Placement runs once after generation. Props carry no occupancy, so
//! carving the ground out from under one leaves it floating. That is
//! accepted for the session.
//!
//! Picks are uniform with replacement over every column whose surface is
//! above zero, so several props may share a column.

use std::f32::consts::TAU;

use ironclad_shared::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::VoxelGrid;

/// Prop category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropKind {
    /// Two-part tree (canopy + trunk).
    Tree = 0,
    /// Boulder.
    Rock = 1,
    /// Grass tuft with random scale.
    Grass = 2,
}

impl PropKind {
    /// All categories, in placement order.
    pub const ALL: [Self; 3] = [Self::Tree, Self::Rock, Self::Grass];

    /// Share of the grid's columns that receive this prop.
    #[inline]
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Tree => 0.06,
            Self::Rock => 0.04,
            Self::Grass => 0.20,
        }
    }

    /// Height above the surface at which the prop is anchored.
    #[inline]
    #[must_use]
    pub const fn ground_offset(self) -> f32 {
        match self {
            Self::Tree => 2.2,
            Self::Rock => 0.35,
            Self::Grass => 0.25,
        }
    }

    /// Number of props of this kind for a grid with `columns` columns.
    #[inline]
    #[must_use]
    pub fn count_for(self, columns: usize) -> usize {
        (columns as f64 * self.fraction()).floor() as usize
    }
}

/// One placed decorative object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prop {
    /// Category.
    pub kind: PropKind,
    /// Anchor position (canopy center for trees).
    pub position: Vec3,
    /// Offset above the surface that `position` was raised by.
    pub ground_offset: f32,
    /// Rotation about +Y, radians in `[0, 2π)`.
    pub yaw: f32,
    /// Uniform scale. Only grass varies.
    pub scale: f32,
    /// Trunk anchor, at half the canopy offset. Trees only.
    pub trunk: Option<Vec3>,
}

/// All props placed for a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropLayout {
    props: Vec<Prop>,
}

impl PropLayout {
    /// Every prop, grouped by kind in placement order.
    #[must_use]
    pub fn all(&self) -> &[Prop] {
        &self.props
    }

    /// Props of one kind.
    pub fn of_kind(&self, kind: PropKind) -> impl Iterator<Item = &Prop> + '_ {
        self.props.iter().filter(move |p| p.kind == kind)
    }

    /// Number of props of one kind.
    #[must_use]
    pub fn count(&self, kind: PropKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Total number of props.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns true if nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

/// Surface spot a prop may be placed on.
#[derive(Clone, Copy, Debug)]
struct Spot {
    x: f32,
    z: f32,
    ground: f32,
}

/// Seeded prop scatter.
pub struct PropPlacer {
    rng: ChaCha8Rng,
}

impl PropPlacer {
    /// Creates a placer. The same seed over the same grid yields the same layout.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Places every category onto `grid`'s current surface.
    ///
    /// An empty surface yields an empty layout.
    pub fn place(&mut self, grid: &VoxelGrid) -> PropLayout {
        let spots = Self::surface_spots(grid);
        let columns = grid.column_count();

        let mut props = Vec::new();
        for kind in PropKind::ALL {
            self.scatter(kind, kind.count_for(columns), &spots, &mut props);
        }

        PropLayout { props }
    }

    fn surface_spots(grid: &VoxelGrid) -> Vec<Spot> {
        let size = grid.size() as i32;
        let mut spots = Vec::with_capacity(grid.column_count());
        for z in 0..size {
            for x in 0..size {
                let center = grid.voxel_to_world(x, 0, z);
                let ground = grid.surface_height(center.x, center.z);
                if ground > 0.0 {
                    spots.push(Spot {
                        x: center.x,
                        z: center.z,
                        ground,
                    });
                }
            }
        }
        spots
    }

    fn scatter(&mut self, kind: PropKind, count: usize, spots: &[Spot], out: &mut Vec<Prop>) {
        if spots.is_empty() {
            return;
        }

        let offset = kind.ground_offset();
        out.reserve(count);
        for _ in 0..count {
            let spot = spots[self.rng.gen_range(0..spots.len())];
            let yaw = self.rng.gen_range(0.0..TAU);
            let scale = match kind {
                PropKind::Grass => self.rng.gen_range(0.6..=1.2),
                PropKind::Tree | PropKind::Rock => 1.0,
            };
            let trunk = match kind {
                PropKind::Tree => Some(Vec3::new(spot.x, spot.ground + offset / 2.0, spot.z)),
                PropKind::Rock | PropKind::Grass => None,
            };

            out.push(Prop {
                kind,
                position: Vec3::new(spot.x, spot.ground + offset, spot.z),
                ground_offset: offset,
                yaw,
                scale,
                trunk,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::generator::TerrainGenerator;

    fn generated(size: u32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(&GridConfig::new(size, 8, 1.0)).unwrap();
        TerrainGenerator::standard().generate(&mut grid);
        grid
    }

    #[test]
    fn test_counts_follow_fractions() {
        let grid = generated(20); // 400 columns
        let layout = PropPlacer::new(1).place(&grid);

        assert_eq!(layout.count(PropKind::Tree), 24);
        assert_eq!(layout.count(PropKind::Rock), 16);
        assert_eq!(layout.count(PropKind::Grass), 80);
        assert_eq!(layout.len(), 120);
    }

    #[test]
    fn test_counts_floor() {
        // 49 columns: 2.94 trees, 1.96 rocks, 9.8 grass
        assert_eq!(PropKind::Tree.count_for(49), 2);
        assert_eq!(PropKind::Rock.count_for(49), 1);
        assert_eq!(PropKind::Grass.count_for(49), 9);
    }

    #[test]
    fn test_props_sit_on_surface() {
        let grid = generated(16);
        let layout = PropPlacer::new(7).place(&grid);

        for prop in layout.all() {
            let ground = grid.surface_height(prop.position.x, prop.position.z);
            assert!(ground > 0.0);
            assert!((prop.position.y - (ground + prop.ground_offset)).abs() < 1e-5);
            assert!((0.0..TAU).contains(&prop.yaw));
        }
    }

    #[test]
    fn test_tree_trunk_at_half_offset() {
        let grid = generated(16);
        let layout = PropPlacer::new(3).place(&grid);

        for tree in layout.of_kind(PropKind::Tree) {
            let trunk = tree.trunk.expect("trees have trunks");
            let ground = tree.position.y - tree.ground_offset;
            assert!((trunk.y - (ground + tree.ground_offset / 2.0)).abs() < 1e-5);
            assert_eq!((trunk.x, trunk.z), (tree.position.x, tree.position.z));
        }
        assert!(layout.of_kind(PropKind::Rock).all(|p| p.trunk.is_none()));
    }

    #[test]
    fn test_grass_scale_range() {
        let grid = generated(32);
        let layout = PropPlacer::new(11).place(&grid);

        for grass in layout.of_kind(PropKind::Grass) {
            assert!((0.6..=1.2).contains(&grass.scale), "scale {}", grass.scale);
        }
        assert!(layout.of_kind(PropKind::Rock).all(|p| p.scale == 1.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let grid = generated(16);
        let a = PropPlacer::new(99).place(&grid);
        let b = PropPlacer::new(99).place(&grid);
        let c = PropPlacer::new(100).place(&grid);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_surface_places_nothing() {
        let grid = VoxelGrid::new(&GridConfig::new(16, 8, 1.0)).unwrap();
        let layout = PropPlacer::new(5).place(&grid);
        assert!(layout.is_empty());
    }
}
