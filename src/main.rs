//! terracell - deterministic chunked voxel terrain with player collision
//!
//! Headless driver: generates a world, drops a player onto it and prints a
//! JSON summary of the run.

mod config;
mod headless;

use anyhow::Result;
use clap::Parser;
use config::SimConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a voxel world and simulate a player on it", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the world seed from the configuration
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,
    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Write the effective configuration to this path and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting terracell v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut sim = match &args.config {
        Some(path) => SimConfig::load_from_path(path),
        None => SimConfig::load(),
    };
    if let Some(seed) = args.seed {
        sim.world.seed = seed;
        sim.world = sim.world.clamped();
    }

    if let Some(path) = &args.dump_config {
        sim.save_to_path(path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        sim,
        seconds: args.seconds,
        fps: args.fps,
    })?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
