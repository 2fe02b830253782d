//! heightwalk: drives characters across procedurally synthesized terrain
//! without a window, logging where they end up.
//!
//! Usage: `heightwalk [config.ron]` (defaults to `heightwalk.ron` in the current directory).
//! `heightwalk --init [config.ron]` writes the default config and exits.

mod character;
mod config;
mod sim;

use std::path::PathBuf;

use anyhow::{Context, Result};
use procgen::TerrainMesh;

use crate::config::SimConfig;
use crate::sim::Simulation;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1).peekable();
    if args.peek().is_some_and(|a| a == "--init") {
        args.next();
        let path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
        SimConfig::default().save(&path)?;
        log::info!("Wrote default config to {:?}", path);
        return Ok(());
    }

    let path = args.next().map(PathBuf::from);
    let config = SimConfig::load(path.as_deref())?;
    config.validate().context("invalid simulation config")?;

    log::info!(
        "Starting heightwalk: seed {:?}, {} characters, {:.1}s at {} Hz",
        config.terrain.seed,
        config.sim.characters,
        config.sim.duration_secs,
        config.sim.fixed_hz
    );

    let mut sim = Simulation::new(&config);

    let mesh = TerrainMesh::build(sim.terrain());
    let (lo, hi) = mesh.height_range();
    log::info!(
        "Terrain {}x{} units, {} vertices, heights {:.2}..{:.2}, origin at {:.3}",
        config.terrain.size,
        config.terrain.size,
        mesh.vertices.len(),
        lo,
        hi,
        sim.terrain().terrain_height(0.0, 0.0)
    );

    let frame_delta = (1.0 / config.sim.frame_hz) as f32;
    let mut next_report = 1.0;
    while sim.clock().elapsed_seconds() < config.sim.duration_secs as f64 {
        sim.frame(frame_delta);
        if sim.clock().elapsed_seconds() >= next_report {
            let grounded = sim.reports().iter().filter(|r| r.on_ground).count();
            log::info!(
                "t={:.1}s: {}/{} characters grounded",
                sim.clock().elapsed_seconds(),
                grounded,
                config.sim.characters
            );
            next_report += 1.0;
        }
    }

    for r in sim.reports() {
        log::info!(
            "Character {}: pos ({:.2}, {:.2}, {:.2}) vel ({:.2}, {:.2}, {:.2}) {} on {} slope {:.1}°",
            r.id,
            r.position.x,
            r.position.y,
            r.position.z,
            r.velocity.x,
            r.velocity.y,
            r.velocity.z,
            if r.on_ground { "grounded" } else { "airborne" },
            r.biome.name(),
            r.slope_deg
        );
    }

    log::info!("Finished after {} ticks", sim.clock().tick_count());
    Ok(())
}
