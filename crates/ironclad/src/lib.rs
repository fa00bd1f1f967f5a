//! # IRONCLAD
//!
//! Battlefield simulation over destructible voxel terrain.
//!
//! ## Architecture
//!
//! ```text
//! Simulation::tick(dt)
//!   └─ ProjectileSystem::update(step) ──► VoxelTerrain
//!        ├─ check_projectile_hit               (ironclad_terrain)
//!        └─ remove_sphere
//! ```
//!
//! The terrain core lives in `ironclad_terrain` and is re-exported as
//! [`terrain`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combat;
pub mod config;
pub mod error;
pub mod game_loop;

pub use ironclad_shared as shared;
pub use ironclad_terrain as terrain;

pub use combat::{ImpactEvent, Projectile, ProjectileId, ProjectileSystem};
pub use config::{CombatConfig, FrameConfig, SimulationConfig};
pub use error::{SimulationError, SimulationResult};
pub use game_loop::{FrameReport, FrameStats, Simulation};
