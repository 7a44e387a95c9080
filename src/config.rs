use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use terracell_core::{BlockRegistry, ResourceParams};
use terracell_physics::PhysicsParams;
use terracell_world::WorldParams;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/terracell.toml";

/// Everything the headless driver reads from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldParams,
    pub physics: PhysicsParams,
    /// Overrides for resource blocks of the standard registry, keyed by name.
    pub resources: BTreeMap<String, ResourceParams>,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Requested walking velocity (right, forward) in blocks per second.
    pub walk: [f32; 2],
    /// Facing, in degrees about +Y.
    pub yaw_degrees: f32,
    /// Extra blocks between the spawn column surface and the player's feet.
    pub drop_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk: [0.0, 0.0],
            yaw_degrees: 0.0,
            drop_height: 2.0,
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    ///
    /// World and resource parameters are clamped into range so a hand-edited
    /// file can never stop the world from generating.
    pub fn load_from_path(path: &Path) -> Self {
        let config = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        };

        let world = config.world.clamped();
        if world != config.world {
            warn!(?world, "World parameters out of range; clamped");
        }
        let resources = config
            .resources
            .iter()
            .map(|(name, params)| {
                let clamped = params.clamped();
                if clamped != *params {
                    warn!(resource = %name, ?clamped, "Resource parameters out of range; clamped");
                }
                (name.clone(), clamped)
            })
            .collect();
        SimConfig {
            world,
            resources,
            ..config
        }
    }

    /// Standard registry with the configured resource overrides applied.
    pub fn block_registry(&self) -> Result<BlockRegistry> {
        self.resources
            .iter()
            .try_fold(BlockRegistry::standard(), |registry, (name, params)| {
                registry
                    .with_resource_params(name, *params)
                    .with_context(|| format!("invalid [resources.{name}] entry"))
            })
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
