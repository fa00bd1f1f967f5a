//! # IRONCLAD Headless
//!
//! Builds a battlefield, shells it from one corner for ten simulated seconds
//! and prints what is left.
//!
//! Usage: `ironclad_headless [config.toml]`

use std::path::PathBuf;
use std::time::Instant;

use ironclad::shared::Vec3;
use ironclad::{Simulation, SimulationConfig, SimulationError};

/// Simulated frames at 60 FPS.
const FRAMES: u32 = 600;

fn main() -> Result<(), SimulationError> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            println!("Loading config from {}", path.display());
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };

    let setup_start = Instant::now();
    let mut sim = Simulation::new(config)?;
    let setup = setup_start.elapsed();

    let half = sim.terrain().grid().half_world();
    let voxels_at_start = sim.terrain().grid().filled_count();

    println!("=== IRONCLAD HEADLESS ===");
    println!(
        "Grid: {0}x{1}x{0} @ {2} units, {3} voxels, {4} props, built in {5:?}",
        config.terrain.grid.size,
        config.terrain.grid.max_height,
        config.terrain.grid.voxel_size,
        voxels_at_start,
        sim.terrain().props().len(),
        setup
    );

    // Turret sits above the -X/-Z corner and sweeps its aim across the map.
    let turret = Vec3::new(-half + 1.0, config.terrain.grid.max_height as f32 * 2.0, -half + 1.0);
    let dt = 1.0 / 60.0;

    let mut shots = 0u32;
    let mut impacts = 0usize;
    let mut removed = 0usize;
    let mut mesh_rebuilds = 0u32;
    let mut worst_frame_us = 0u64;

    let run_start = Instant::now();
    for frame in 0..FRAMES {
        let sweep = frame as f32 / FRAMES as f32;
        let target = Vec3::new(
            -half * 0.5 + sweep * half * 1.5,
            0.0,
            half * 0.8 - sweep * half * 1.6,
        );
        let aim = target - turret + Vec3::new(0.0, 6.0, 0.0);
        if sim.fire(turret, aim).is_some() {
            shots += 1;
        }

        let report = sim.tick(dt);
        impacts += report.impacts.len();
        removed += report.removed;
        mesh_rebuilds += u32::from(report.mesh_changed);
        worst_frame_us = worst_frame_us.max(report.stats.total_us);
    }
    let run = run_start.elapsed();

    let voxels_at_end = sim.terrain().grid().filled_count();
    println!("Shots fired:     {shots}");
    println!("Impacts:         {impacts}");
    println!("Still in flight: {}", sim.projectiles().in_flight());
    println!("Voxels removed:  {removed} ({voxels_at_start} -> {voxels_at_end})");
    println!(
        "Mesh rebuilds:   {mesh_rebuilds} (generation {}, {} instances)",
        sim.terrain().mesh_generation(),
        sim.terrain().mesh().len()
    );
    println!("Ground at origin: {:.2}", sim.ground_height(0.0, 0.0));
    println!("Simulated {FRAMES} frames in {run:?}, worst frame {worst_frame_us}us");

    sim.terrain().grid().check_invariants()?;
    println!("Occupancy invariants hold.");

    Ok(())
}
