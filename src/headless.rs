use crate::config::SimConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Serialize;
use std::sync::Arc;
use terracell_physics::{Physics, Player};
use terracell_testkit::{world_fingerprint, Fingerprint};
use terracell_world::World;
use tracing::{debug, info};

/// Knobs for one headless run.
pub struct HeadlessConfig {
    pub sim: SimConfig,
    /// Simulated wall-clock seconds.
    pub seconds: f32,
    /// Render frames per simulated second; each frame hands `1 / fps` to physics.
    pub fps: u32,
}

/// What a run ended with, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub fingerprint: Fingerprint,
    pub chunks: usize,
    pub spawn: [f32; 3],
    pub position: [f32; 3],
    pub on_ground: bool,
    pub frames: u32,
    pub steps: u64,
}

/// Generate the world, drop the player onto the centre column and simulate.
pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let registry = Arc::new(cfg.sim.block_registry()?);
    let mut world =
        World::new(cfg.sim.world, registry).context("world parameters rejected")?;
    world.generate()?;
    let fingerprint = world_fingerprint(&world);
    info!(seed = cfg.sim.world.seed, %fingerprint, "world ready");

    let spawn = spawn_point(&world, &cfg.sim)?;
    let mut player = Player::at(spawn);
    player.yaw = cfg.sim.player.yaw_degrees.to_radians();
    let [right, forward] = cfg.sim.player.walk;
    player.input = Vec3::new(right, 0.0, -forward);

    let mut physics = Physics::new(cfg.sim.physics);
    let fps = cfg.fps.max(1);
    let frames = (cfg.seconds.max(0.0) * fps as f32).round() as u32;
    let dt = 1.0 / fps as f32;
    for frame in 0..frames {
        let steps = physics.update(dt, &mut player, &world);
        if frame % fps == 0 {
            debug!(
                frame,
                steps,
                position = ?player.position,
                on_ground = player.on_ground,
                "frame"
            );
        }
    }

    let summary = RunSummary {
        seed: cfg.sim.world.seed,
        fingerprint,
        chunks: world.chunk_count(),
        spawn: spawn.to_array(),
        position: player.position.to_array(),
        on_ground: player.on_ground,
        frames,
        steps: physics.tick().0,
    };
    info!(
        steps = summary.steps,
        on_ground = summary.on_ground,
        "run complete"
    );
    Ok(summary)
}

/// Head position above the middle column of the origin chunk.
fn spawn_point(world: &World, sim: &SimConfig) -> Result<Vec3> {
    let width = sim.world.chunk_size.width;
    let column = width / 2;
    let chunk = world
        .get_chunk(0, 0)
        .context("origin chunk missing after generation")?;
    let surface = chunk.surface_height(column, column).unwrap_or(0) as f32;
    let player = Player::default();
    let feet = surface + 1.0 + sim.player.drop_height.max(0.0);
    Ok(Vec3::new(
        column as f32 + 0.5,
        feet + player.height,
        column as f32 + 0.5,
    ))
}
