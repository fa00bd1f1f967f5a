//! # Simulation Error Types

use ironclad_terrain::TerrainError;
use thiserror::Error;

/// Errors that can occur while setting up a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Terrain construction or configuration failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// A combat or frame setting is out of range.
    #[error("invalid combat config: {field} {reason}")]
    InvalidCombatConfig {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result type for simulation setup.
pub type SimulationResult<T> = Result<T, SimulationError>;
