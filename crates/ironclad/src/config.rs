//! # Simulation Configuration
//!
//! One TOML file configures the whole session. Missing sections and keys
//! fall back to their defaults:
//!
//! ```toml
//! [terrain.grid]
//! size = 64
//!
//! [combat]
//! blast_radius = 3.0
//!
//! [frame]
//! target_fps = 120
//! ```

use std::path::Path;

use ironclad_terrain::{TerrainConfig, TerrainError};
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// Projectile ballistics and blast settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Launch speed, world units per second.
    pub muzzle_speed: f32,
    /// Downward acceleration, world units per second squared.
    pub gravity: f32,
    /// Seconds between shots.
    pub fire_cooldown: f32,
    /// Radius of the sphere carved on impact.
    pub blast_radius: f32,
    /// Projectiles below this height are despawned.
    pub kill_floor: f32,
    /// Projectiles farther than this from the world origin are despawned.
    pub max_range: f32,
    /// Maximum projectiles in flight.
    pub max_projectiles: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            muzzle_speed: 60.0,
            gravity: 20.0,
            fire_cooldown: 0.4,
            blast_radius: 2.0,
            kill_floor: -10.0,
            max_range: 400.0,
            max_projectiles: 64,
        }
    }
}

/// Fixed-step timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Simulation steps per second.
    pub target_fps: u32,
    /// Upper bound on steps run for one frame.
    pub max_substeps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_substeps: 4,
        }
    }
}

impl FrameConfig {
    /// Length of one fixed step, in seconds.
    #[inline]
    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

/// Complete session configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Terrain dimensions and props.
    pub terrain: TerrainConfig,
    /// Projectile settings.
    pub combat: CombatConfig,
    /// Frame timing.
    pub frame: FrameConfig,
}

impl SimulationConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not match the schema or a value is
    /// out of range.
    pub fn from_toml_str(text: &str) -> SimulationResult<Self> {
        let config: Self = toml::from_str(text).map_err(TerrainError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// validation.
    pub fn load(path: &Path) -> SimulationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks combat and frame settings.
    ///
    /// Grid dimensions are checked when the grid is built.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidCombatConfig`] naming the first bad key.
    pub fn validate(&self) -> SimulationResult<()> {
        let combat = &self.combat;
        let positive = [
            ("muzzle_speed", combat.muzzle_speed),
            ("blast_radius", combat.blast_radius),
            ("max_range", combat.max_range),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be positive and finite"));
            }
        }

        let non_negative = [
            ("gravity", combat.gravity),
            ("fire_cooldown", combat.fire_cooldown),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be non-negative and finite"));
            }
        }

        if !combat.kill_floor.is_finite() {
            return Err(invalid("kill_floor", "must be finite"));
        }
        if combat.max_projectiles == 0 {
            return Err(invalid("max_projectiles", "must be at least 1"));
        }
        if self.frame.target_fps == 0 {
            return Err(invalid("target_fps", "must be at least 1"));
        }
        if self.frame.max_substeps == 0 {
            return Err(invalid("max_substeps", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SimulationError {
    SimulationError::InvalidCombatConfig { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.combat.muzzle_speed, 60.0);
        assert_eq!(config.frame.target_fps, 60);
        assert_eq!(config.terrain.grid.size, 64);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [terrain.grid]
            size = 32

            [combat]
            blast_radius = 3.5
            "#,
        )
        .unwrap();

        assert_eq!(config.terrain.grid.size, 32);
        assert_eq!(config.terrain.grid.max_height, 8);
        assert_eq!(config.combat.blast_radius, 3.5);
        assert_eq!(config.combat.gravity, 20.0);
        assert_eq!(config.frame, FrameConfig::default());
    }

    #[test]
    fn test_rejects_zero_blast_radius() {
        let err = SimulationConfig::from_toml_str("[combat]\nblast_radius = 0.0").unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidCombatConfig {
                field: "blast_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let err = SimulationConfig::from_toml_str("[frame]\ntarget_fps = 0").unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidCombatConfig {
                field: "target_fps",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_toml_is_terrain_parse_error() {
        let err = SimulationConfig::from_toml_str("[combat\n").unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Terrain(TerrainError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::load(Path::new("/nonexistent/ironclad.toml")).unwrap_err();
        assert!(matches!(err, SimulationError::Terrain(TerrainError::ConfigIo { .. })));
    }

    #[test]
    fn test_step_seconds() {
        let frame = FrameConfig {
            target_fps: 50,
            max_substeps: 4,
        };
        assert!((frame.step_seconds() - 0.02).abs() < 1e-7);
    }
}
