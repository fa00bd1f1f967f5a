//! # IRONCLAD Game Loop
//!
//! ```text
//! tick(dt):
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. ACCUMULATE                                                │
//! │    └─ dt added to the step accumulator                       │
//! │                                                              │
//! │ 2. FIXED STEPS (at most max_substeps)                        │
//! │    └─ ProjectileSystem::update(step, terrain)                │
//! │         ├─ check_projectile_hit per projectile               │
//! │         └─ remove_sphere on hit, mesh rebuilt if it changed  │
//! │                                                              │
//! │ 3. REPORT                                                    │
//! │    └─ impacts, voxels removed, mesh generation, timings      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use ironclad_shared::Vec3;
use ironclad_terrain::VoxelTerrain;
use tracing::{info, trace, warn};

use crate::combat::{ImpactEvent, ProjectileId, ProjectileSystem};
use crate::config::SimulationConfig;
use crate::error::SimulationResult;

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Slowest fixed step in microseconds.
    pub slowest_step_us: u64,
    /// Frame number.
    pub frame: u64,
}

/// What happened during one [`Simulation::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run.
    pub steps: u32,
    /// Impacts across all steps, in order.
    pub impacts: Vec<ImpactEvent>,
    /// Voxels removed across all impacts.
    pub removed: usize,
    /// True if the terrain mesh was rebuilt during this frame.
    pub mesh_changed: bool,
    /// Timings.
    pub stats: FrameStats,
}

/// The battlefield: terrain plus everything that shoots at it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    terrain: VoxelTerrain,
    projectiles: ProjectileSystem,
    /// Unsimulated time carried between frames, in seconds.
    accumulator: f32,
    frame: u64,
}

impl Simulation {
    /// Validates `config`, builds the terrain and generates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation or the grid
    /// dimensions are invalid.
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let mut terrain = VoxelTerrain::new(config.terrain)?;
        terrain.generate();

        info!(
            "Simulation ready: {} Hz fixed step, up to {} steps per frame",
            config.frame.target_fps, config.frame.max_substeps
        );

        Ok(Self {
            projectiles: ProjectileSystem::new(config.combat),
            config,
            terrain,
            accumulator: 0.0,
            frame: 0,
        })
    }

    /// Fires a projectile. See [`ProjectileSystem::fire`].
    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> Option<ProjectileId> {
        self.projectiles.fire(origin, direction)
    }

    /// Advances the simulation by `dt` seconds of wall time.
    ///
    /// Time is consumed in fixed steps of `1 / target_fps`. Leftover time
    /// carries over to the next frame. If more than `max_substeps` steps are
    /// owed, the extra backlog is dropped. Negative or non-finite `dt` counts
    /// as zero.
    pub fn tick(&mut self, dt: f32) -> FrameReport {
        let frame_start = Instant::now();
        let step = self.config.frame.step_seconds();
        let generation_before = self.terrain.mesh_generation();

        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let mut report = FrameReport::default();
        let mut slowest = Duration::ZERO;

        while self.accumulator >= step && report.steps < self.config.frame.max_substeps {
            let step_start = Instant::now();
            let impacts = self.projectiles.update(step, &mut self.terrain);
            slowest = slowest.max(step_start.elapsed());

            report.removed += impacts.iter().map(|i| i.removed).sum::<usize>();
            report.impacts.extend(impacts);
            report.steps += 1;
            self.accumulator -= step;
        }

        if self.accumulator >= step {
            trace!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        report.mesh_changed = self.terrain.mesh_generation() != generation_before;
        report.stats = FrameStats {
            total_us: frame_start.elapsed().as_micros() as u64,
            slowest_step_us: slowest.as_micros() as u64,
            frame: self.frame,
        };

        let budget_us = u64::from(1_000_000 / self.config.frame.target_fps);
        if report.stats.total_us > budget_us {
            warn!(
                "Frame {} over budget: {}us > {}us ({} impacts, {} voxels removed)",
                self.frame,
                report.stats.total_us,
                budget_us,
                report.impacts.len(),
                report.removed
            );
        }

        self.frame += 1;
        report
    }

    /// Ground level for vehicles at `(world_x, world_z)`.
    #[inline]
    #[must_use]
    pub fn ground_height(&self, world_x: f32, world_z: f32) -> f32 {
        self.terrain.surface_height(world_x, world_z)
    }

    /// The terrain.
    #[inline]
    #[must_use]
    pub fn terrain(&self) -> &VoxelTerrain {
        &self.terrain
    }

    /// Projectiles in flight.
    #[inline]
    #[must_use]
    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    /// Frames ticked so far.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Session configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
