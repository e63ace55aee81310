//! # RandomSpawn Plugin
//!
//! Places players at random, survivable locations inside a configured region
//! using [`spawn_engine`].
//!
//! ## Overview
//!
//! - **First Join**: New players are teleported to a random location shortly
//!   after they join
//! - **Death Respawn**: Respawns that aren't claimed by a bed or respawn anchor
//!   go to a random location, optionally followed by a server transfer
//! - **Administration**: `/rd reload` and `/random reload` re-read the
//!   configuration without a restart
//!
//! The plugin talks to its server only through [`SpawnHost`]. Configuration
//! lives in a TOML file (see [`config`]); a missing file is created with
//! defaults on enable.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use plugin_random_spawn::RandomSpawnPlugin;
//!
//! let plugin = RandomSpawnPlugin::enable("randomspawn.toml", host).await?;
//! plugin.on_player_join(&join_event);
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - TOML configuration and its conversion to a policy
//! - [`events`] - Join, respawn and command payloads
//! - [`handlers`] - Event handlers
//! - [`host`] - The server interface the plugin depends on

use spawn_engine::{RandomSource, SpawnPolicy, SpawnSelector, ThreadRandom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod host;

#[cfg(test)]
mod test_support;

pub use config::SpawnConfig;
pub use error::PluginError;
pub use events::{CommandEvent, CommandSender, PlayerId, PlayerJoinEvent, PlayerRespawnEvent};
pub use host::SpawnHost;

use handlers::*;

/// The random spawn plugin.
///
/// Owns the [`SpawnSelector`] (policy snapshot and safe-location cache) and a
/// handle to the host. Cheap to share: handlers clone the inner `Arc`s.
pub struct RandomSpawnPlugin {
    name: String,
    config_path: PathBuf,
    host: Arc<dyn SpawnHost>,
    selector: Arc<SpawnSelector>,
    /// Delay before acting on joined or respawned players
    task_delay: Duration,
}

impl RandomSpawnPlugin {
    /// Loads (or creates) the configuration at `config_path` and builds the
    /// selector.
    ///
    /// # Errors
    ///
    /// Returns an error when the file can't be read, parsed or validated.
    pub async fn enable(
        config_path: impl AsRef<Path>,
        host: Arc<dyn SpawnHost>,
    ) -> Result<Self, PluginError> {
        Self::enable_with_random(config_path, host, Arc::new(ThreadRandom)).await
    }

    /// Like [`enable`](Self::enable) with an explicit random source.
    pub async fn enable_with_random(
        config_path: impl AsRef<Path>,
        host: Arc<dyn SpawnHost>,
        rng: Arc<dyn RandomSource>,
    ) -> Result<Self, PluginError> {
        let config_path = config_path.as_ref().to_path_buf();
        let policy = load_policy(&config_path, host.as_ref()).await?;

        debug!(
            "🎲 RandomSpawn: Enabled worlds: {:?}",
            policy.enabled_worlds().collect::<Vec<_>>()
        );

        let plugin = Self {
            name: "RandomSpawn".to_string(),
            config_path,
            host,
            selector: Arc::new(SpawnSelector::with_random(policy, rng)),
            task_delay: PLAYER_SETTLE_DELAY,
        };

        info!("🎲 RandomSpawn: ✅ Plugin enabled (v{})", plugin.version());
        Ok(plugin)
    }

    /// Overrides the delay before first-join teleports and respawn transfers.
    pub fn with_task_delay(mut self, delay: Duration) -> Self {
        self.task_delay = delay;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn selector(&self) -> &Arc<SpawnSelector> {
        &self.selector
    }

    /// The policy snapshot currently in force.
    pub fn policy(&self) -> Arc<SpawnPolicy> {
        self.selector.policy()
    }

    pub fn host(&self) -> &Arc<dyn SpawnHost> {
        &self.host
    }

    /// Re-reads the configuration file and swaps in the new policy, clearing
    /// the safe-location cache.
    ///
    /// On error the previous policy stays in force.
    pub async fn reload(&self) -> Result<(), PluginError> {
        let policy = load_policy(&self.config_path, self.host.as_ref()).await?;
        self.selector.on_policy_reload(policy);
        Ok(())
    }

    /// See [`handle_player_join`].
    pub fn on_player_join(&self, event: &PlayerJoinEvent) -> Option<JoinHandle<()>> {
        handle_player_join(
            event,
            Arc::clone(&self.selector),
            Arc::clone(&self.host),
            self.task_delay,
        )
    }

    /// See [`handle_player_respawn`].
    pub fn on_player_respawn(&self, event: &mut PlayerRespawnEvent) -> Option<JoinHandle<()>> {
        handle_player_respawn(event, &self.selector, Arc::clone(&self.host), self.task_delay)
    }

    /// See [`handle_command`].
    pub async fn on_command(&self, event: &CommandEvent) -> bool {
        handle_command(self, event).await
    }

    pub fn on_disable(&self) {
        info!(
            "🎲 RandomSpawn: Plugin disabled ({} cached locations dropped)",
            self.selector
                .cache()
                .summary()
                .iter()
                .map(|(_, count)| count)
                .sum::<usize>()
        );
    }
}

async fn load_policy(path: &Path, host: &dyn SpawnHost) -> Result<SpawnPolicy, PluginError> {
    let config = SpawnConfig::load_from_file(path).await?;
    config.validate().map_err(PluginError::InvalidConfig)?;

    let worlds = host.worlds();
    config.to_policy(worlds.first().map(String::as_str))
}

impl std::fmt::Debug for RandomSpawnPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSpawnPlugin")
            .field("name", &self.name)
            .field("config_path", &self.config_path)
            .field("selector", &self.selector)
            .field("task_delay", &self.task_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockHost;
    use spawn_engine::SeededRandom;

    #[tokio::test]
    async fn test_enable_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("randomspawn.toml");
        let host = Arc::new(MockHost::new());

        let plugin = RandomSpawnPlugin::enable(&path, host).await.unwrap();
        assert!(path.exists());
        assert_eq!(plugin.name(), "RandomSpawn");
        assert_eq!(plugin.policy().max_tries(), 50);
        // No worlds configured: the host's primary world is used.
        assert!(plugin.policy().is_world_enabled("world"));
        assert!(!plugin.policy().is_world_enabled("world_nether"));
    }

    #[tokio::test]
    async fn test_enable_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("randomspawn.toml");
        tokio::fs::write(&path, "enabled_worlds = [\"\"]\n").await.unwrap();

        let result = RandomSpawnPlugin::enable(&path, Arc::new(MockHost::new())).await;
        assert!(matches!(result, Err(PluginError::InvalidConfig(_))));

        tokio::fs::write(&path, "enabled_worlds = 3\n").await.unwrap();
        let result = RandomSpawnPlugin::enable(&path, Arc::new(MockHost::new())).await;
        assert!(matches!(result, Err(PluginError::ConfigParse(_))));
    }

    #[tokio::test]
    async fn test_join_and_respawn_through_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("randomspawn.toml");
        tokio::fs::write(
            &path,
            "[spawn]\nforce_ground_spawn = true\ntransfer_to_server = \"lobby\"\n",
        )
        .await
        .unwrap();
        let host = Arc::new(MockHost::new());
        let plugin = RandomSpawnPlugin::enable_with_random(&path, host.clone(), Arc::new(SeededRandom::new(11)))
            .await
            .unwrap()
            .with_task_delay(Duration::ZERO);

        let player = host.add_player("world");
        plugin
            .on_player_join(&PlayerJoinEvent { player_id: player, has_played_before: false })
            .unwrap()
            .await
            .unwrap();
        let teleports = host.teleports();
        assert_eq!(teleports.len(), 1);
        assert_eq!(teleports[0].1.y, 64.0);

        let mut respawn = PlayerRespawnEvent::new(player, "world");
        plugin.on_player_respawn(&mut respawn).unwrap().await.unwrap();
        assert_eq!(respawn.respawn_location.map(|l| l.y), Some(64.0));
        assert_eq!(host.transfers(), vec![(player, "lobby".to_string())]);
        assert!(plugin.selector().cache().len("world") >= 1);

        plugin.on_disable();
    }
}
