//! Configuration management for the random spawn plugin.
//!
//! This module handles loading, validation, and conversion of the plugin's
//! TOML configuration into an immutable [`SpawnPolicy`].
//!
//! ## File Layout
//!
//! ```toml
//! enabled_worlds = ["world"]
//! fatal_blocks = ["LAVA", "MAGMA_BLOCK", "CACTUS"]
//!
//! [spawn]
//! force_ground_spawn = false
//! max_tries = 50
//! transfer_to_server = ""
//!
//! [spawn.x]
//! min = -1000
//! max = 1000
//!
//! [spawn.y]
//! min = 64
//! max = 128
//!
//! [spawn.z]
//! min = -1000
//! max = 1000
//!
//! [events]
//! first_join = true
//! respawn_on_death = true
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use crate::error::PluginError;
use serde::{Deserialize, Serialize};
use spawn_engine::{Region, SpawnPolicy};
use std::path::Path;
use tracing::info;

fn default_true() -> bool {
    true
}

fn default_max_tries() -> u32 {
    50
}

fn default_x_bounds() -> AxisBounds {
    AxisBounds { min: -1000, max: 1000 }
}

fn default_y_bounds() -> AxisBounds {
    AxisBounds { min: 64, max: 128 }
}

fn default_z_bounds() -> AxisBounds {
    AxisBounds { min: -1000, max: 1000 }
}

fn default_fatal_blocks() -> Vec<String> {
    [
        "LAVA",
        "MAGMA_BLOCK",
        "CACTUS",
        "FIRE",
        "CAMPFIRE",
        "SOUL_FIRE",
        "SOUL_CAMPFIRE",
        "SWEET_BERRY_BUSH",
        "WITHER_ROSE",
        "POWDER_SNOW",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

/// Plugin configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Worlds where random placement applies. Empty means the host's first world.
    #[serde(default)]
    pub enabled_worlds: Vec<String>,
    /// Materials that are never acceptable to stand on (case-insensitive)
    #[serde(default = "default_fatal_blocks")]
    pub fatal_blocks: Vec<String>,
    #[serde(default)]
    pub spawn: SpawnSettings,
    #[serde(default)]
    pub events: EventSettings,
}

/// Sampling region and selection behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSettings {
    /// Snap to the terrain surface instead of sampling y
    #[serde(default)]
    pub force_ground_spawn: bool,
    /// Live sampling attempts before falling back to cached locations
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    /// Server to transfer players to after a random respawn; empty disables it
    #[serde(default)]
    pub transfer_to_server: String,
    #[serde(default = "default_x_bounds")]
    pub x: AxisBounds,
    #[serde(default = "default_y_bounds")]
    pub y: AxisBounds,
    #[serde(default = "default_z_bounds")]
    pub z: AxisBounds,
}

/// Inclusive bounds of one axis. Order does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: i32,
    pub max: i32,
}

/// Which player events trigger random placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSettings {
    #[serde(default = "default_true")]
    pub first_join: bool,
    #[serde(default = "default_true")]
    pub respawn_on_death: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enabled_worlds: Vec::new(),
            fatal_blocks: default_fatal_blocks(),
            spawn: SpawnSettings::default(),
            events: EventSettings::default(),
        }
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            force_ground_spawn: false,
            max_tries: default_max_tries(),
            transfer_to_server: String::new(),
            x: default_x_bounds(),
            y: default_y_bounds(),
            z: default_z_bounds(),
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            first_join: true,
            respawn_on_death: true,
        }
    }
}

impl SpawnConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to that path
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> Result<Self, PluginError> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: SpawnConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = SpawnConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default spawn configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency.
    ///
    /// Inverted axis bounds are accepted; the engine normalizes them.
    pub fn validate(&self) -> Result<(), String> {
        if self.spawn.max_tries == 0 {
            return Err("spawn.max_tries must be greater than 0".to_string());
        }

        if self.fatal_blocks.iter().any(|m| m.trim().is_empty()) {
            return Err("fatal_blocks cannot contain empty entries".to_string());
        }

        if self.enabled_worlds.iter().any(|w| w.trim().is_empty()) {
            return Err("enabled_worlds cannot contain empty entries".to_string());
        }

        Ok(())
    }

    pub fn region(&self) -> Region {
        let SpawnSettings { x, y, z, .. } = &self.spawn;
        Region::new(x.min, x.max, y.min, y.max, z.min, z.max)
    }

    /// Converts the configuration into a policy snapshot.
    ///
    /// # Arguments
    ///
    /// * `default_world` - World enabled when `enabled_worlds` is empty
    ///   (normally the host's first world)
    pub fn to_policy(&self, default_world: Option<&str>) -> Result<SpawnPolicy, PluginError> {
        let enabled_worlds: Vec<String> = if self.enabled_worlds.is_empty() {
            default_world.map(str::to_string).into_iter().collect()
        } else {
            self.enabled_worlds.clone()
        };

        let policy = SpawnPolicy::builder()
            .region(self.region())
            .force_ground_spawn(self.spawn.force_ground_spawn)
            .max_tries(self.spawn.max_tries)
            .fatal_blocks(self.fatal_blocks.iter().cloned())
            .enabled_worlds(enabled_worlds)
            .first_join_enabled(self.events.first_join)
            .respawn_on_death_enabled(self.events.respawn_on_death)
            .transfer_server_name(Some(self.spawn.transfer_to_server.clone()))
            .build()?;

        Ok(policy)
    }
}
