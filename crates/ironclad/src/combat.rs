//! # Combat
//!
//! Ballistic projectiles that carve the terrain where they land.
//!
//! Each update moves every projectile along its velocity, applies gravity,
//! and tests the segment it just travelled against the terrain. Projectiles
//! are handled one at a time in fire order, so a later projectile sees the
//! crater left by an earlier one in the same update.

use ironclad_shared::Vec3;
use ironclad_terrain::VoxelTerrain;
use tracing::{debug, trace};

use crate::config::CombatConfig;

/// Identifies a fired projectile. Assigned sequentially from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileId(pub u32);

/// A projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
}

/// A projectile struck the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactEvent {
    /// Projectile that hit.
    pub projectile: ProjectileId,
    /// Impact point.
    pub point: Vec3,
    /// Voxels carved by the blast.
    pub removed: usize,
}

/// Owns every projectile in flight and the fire cooldown.
#[derive(Debug)]
pub struct ProjectileSystem {
    config: CombatConfig,
    projectiles: Vec<Projectile>,
    cooldown: f32,
    next_id: u32,
}

impl ProjectileSystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new(config: CombatConfig) -> Self {
        Self {
            projectiles: Vec::with_capacity(config.max_projectiles),
            config,
            cooldown: 0.0,
            next_id: 0,
        }
    }

    /// Launches a projectile from `origin` along `direction`.
    ///
    /// Returns `None` while the cooldown is running, when the in-flight limit
    /// is reached, or when `direction` has no usable length.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> Option<ProjectileId> {
        if self.cooldown > 0.0 {
            trace!("Fire refused: cooldown {:.3}s", self.cooldown);
            return None;
        }
        if self.projectiles.len() >= self.config.max_projectiles {
            trace!("Fire refused: {} projectiles in flight", self.projectiles.len());
            return None;
        }
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.normalized()?;

        let id = ProjectileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position: origin,
            velocity: direction * self.config.muzzle_speed,
        });
        self.cooldown = self.config.fire_cooldown;
        Some(id)
    }

    /// Advances every projectile by `dt` seconds.
    ///
    /// Impacts are returned in fire order. A projectile that hits is removed
    /// after its blast is applied; one that falls below the kill floor or
    /// leaves the play range is removed silently.
    pub fn update(&mut self, dt: f32, terrain: &mut VoxelTerrain) -> Vec<ImpactEvent> {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let mut impacts = Vec::new();
        let config = self.config;

        self.projectiles.retain_mut(|p| {
            let previous = p.position;
            p.position += p.velocity * dt;
            p.velocity.y -= config.gravity * dt;

            if let Some(point) = terrain.check_projectile_hit(previous, p.position) {
                let removed = terrain.remove_sphere(point, config.blast_radius);
                debug!(
                    "Projectile {} impact at ({:.2}, {:.2}, {:.2}), {} voxels removed",
                    p.id.0, point.x, point.y, point.z, removed
                );
                impacts.push(ImpactEvent {
                    projectile: p.id,
                    point,
                    removed,
                });
                return false;
            }

            if p.position.y < config.kill_floor || p.position.length() > config.max_range {
                trace!("Projectile {} despawned at y={:.2}", p.id.0, p.position.y);
                return false;
            }

            true
        });

        impacts
    }

    /// Projectiles in flight, in fire order.
    #[inline]
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Number of projectiles in flight.
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.projectiles.len()
    }

    /// Seconds until the next shot is allowed.
    #[inline]
    #[must_use]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Combat settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}
