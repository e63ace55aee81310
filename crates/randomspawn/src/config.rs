//! Configuration management for the RandomSpawn console host.
//!
//! This module handles loading and validation of the host configuration:
//! where the plugin's own configuration lives, how to log, and the shape of
//! the superflat worlds the host simulates.

use serde::{Deserialize, Serialize};
use spawn_engine::MemoryTerrain;
use std::path::{Path, PathBuf};
use tracing::info;

fn default_spawn_config() -> PathBuf {
    PathBuf::from("randomspawn-plugin.toml")
}

fn default_max_height() -> i32 {
    256
}

fn default_world_names() -> Vec<String> {
    vec!["world".to_string()]
}

fn default_layers() -> Vec<LayerSettings> {
    [("BEDROCK", 1), ("STONE", 59), ("DIRT", 3), ("GRASS_BLOCK", 1)]
        .iter()
        .map(|(material, thickness)| LayerSettings {
            material: material.to_string(),
            thickness: *thickness,
        })
        .collect()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the plugin configuration file
    #[serde(default = "default_spawn_config")]
    pub spawn_config: PathBuf,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Simulated worlds
    #[serde(default)]
    pub worlds: WorldSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

/// Superflat worlds created at startup.
///
/// Every world shares the same layer stack. The first name is the primary
/// world, where new players appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "default_world_names")]
    pub names: Vec<String>,
    /// Cells above this height are outside the world
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    /// Layers stacked upward from y = 0
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
    pub material: String,
    pub thickness: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spawn_config: default_spawn_config(),
            logging: LoggingSettings::default(),
            worlds: WorldSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            names: default_world_names(),
            max_height: default_max_height(),
            layers: default_layers(),
        }
    }
}

impl WorldSettings {
    /// Builds one terrain per configured world name.
    pub fn build_terrains(&self) -> Vec<MemoryTerrain> {
        self.names
            .iter()
            .map(|name| {
                MemoryTerrain::superflat(
                    name.as_str(),
                    self.max_height,
                    self.layers
                        .iter()
                        .map(|layer| (layer.material.as_str(), layer.thickness)),
                )
            })
            .collect()
    }

    /// Height of the top layer surface, i.e. the first air cell.
    pub fn surface_height(&self) -> u64 {
        self.layers.iter().map(|layer| u64::from(layer.thickness)).sum()
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading/creation failed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.worlds.names.is_empty() {
            return Err("At least one world must be configured".to_string());
        }

        if self.worlds.names.iter().any(|name| name.trim().is_empty()) {
            return Err("World names cannot be empty".to_string());
        }

        if self.worlds.max_height <= 0 {
            return Err("worlds.max_height must be greater than 0".to_string());
        }

        // max_height is positive here, so the cast is lossless.
        if self.worlds.surface_height() >= self.worlds.max_height as u64 {
            return Err(format!(
                "World layers ({} blocks) must stay below max_height {}",
                self.worlds.surface_height(),
                self.worlds.max_height
            ));
        }

        Ok(())
    }
}
