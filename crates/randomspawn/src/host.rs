//! In-process host that stands in for a game server.
//!
//! Players exist only as names; teleports, transfers and messages are logged
//! instead of being sent anywhere.

use async_trait::async_trait;
use dashmap::DashMap;
use plugin_random_spawn::{CommandSender, PlayerId, PluginError, SpawnHost};
use spawn_engine::{Location, MemoryTerrain, Terrain};
use std::sync::Arc;
use tracing::info;

/// State of one simulated player.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub world: String,
    pub location: Option<Location>,
    pub online: bool,
}

pub struct ConsoleHost {
    worlds: Vec<Arc<MemoryTerrain>>,
    /// Player name to ID
    names: DashMap<String, PlayerId>,
    players: DashMap<PlayerId, PlayerState>,
}

impl ConsoleHost {
    /// A host serving `worlds`; the first is the primary world.
    pub fn new(worlds: Vec<MemoryTerrain>) -> Self {
        Self {
            worlds: worlds.into_iter().map(Arc::new).collect(),
            names: DashMap::new(),
            players: DashMap::new(),
        }
    }

    pub fn primary_world(&self) -> Option<&str> {
        self.worlds.first().map(|w| w.name())
    }

    /// Marks `name` online, creating the player in the primary world on
    /// first sight.
    ///
    /// Returns the player's ID and whether they had joined before.
    pub fn connect(&self, name: &str) -> Option<(PlayerId, bool)> {
        if let Some(id) = self.names.get(name).map(|id| *id) {
            if let Some(mut player) = self.players.get_mut(&id) {
                player.online = true;
            }
            return Some((id, true));
        }

        let world = self.primary_world()?.to_string();
        let id = PlayerId::new();
        self.names.insert(name.to_string(), id);
        self.players.insert(
            id,
            PlayerState {
                id,
                name: name.to_string(),
                world,
                location: None,
                online: true,
            },
        );
        Some((id, false))
    }

    pub fn player(&self, name: &str) -> Option<PlayerState> {
        let id = *self.names.get(name)?;
        self.players.get(&id).map(|player| player.clone())
    }

    /// Moves a player to `location`, switching worlds if needed.
    pub fn set_location(&self, id: PlayerId, location: Location) {
        if let Some(mut player) = self.players.get_mut(&id) {
            player.world = location.world.clone();
            player.location = Some(location);
        }
    }

    pub fn online_count(&self) -> usize {
        self.players.iter().filter(|p| p.online).count()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    fn display_name(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[async_trait]
impl SpawnHost for ConsoleHost {
    fn worlds(&self) -> Vec<String> {
        self.worlds.iter().map(|w| w.name().to_string()).collect()
    }

    fn terrain(&self, world: &str) -> Option<Arc<dyn Terrain>> {
        self.worlds
            .iter()
            .find(|w| w.name() == world)
            .map(|w| Arc::clone(w) as Arc<dyn Terrain>)
    }

    fn world_of(&self, player: PlayerId) -> Option<String> {
        self.players.get(&player).map(|p| p.world.clone())
    }

    fn is_online(&self, player: PlayerId) -> bool {
        self.players.get(&player).is_some_and(|p| p.online)
    }

    /// Only the console holds permissions.
    fn has_permission(&self, sender: &CommandSender, _permission: &str) -> bool {
        matches!(sender, CommandSender::Console)
    }

    async fn teleport(&self, player: PlayerId, location: Location) -> Result<(), PluginError> {
        if !self.players.contains_key(&player) {
            return Err(PluginError::Host(format!("Unknown player {}", player)));
        }
        info!("🚀 Teleported {} to {}", self.display_name(player), location);
        self.set_location(player, location);
        Ok(())
    }

    async fn transfer(&self, player: PlayerId, server: &str) -> Result<(), PluginError> {
        let mut state = self
            .players
            .get_mut(&player)
            .ok_or_else(|| PluginError::Host(format!("Unknown player {}", player)))?;
        state.online = false;
        info!("🔀 Transferred {} to server '{}'", state.name, server);
        Ok(())
    }

    async fn send_message(&self, recipient: &CommandSender, message: &str) {
        match recipient {
            CommandSender::Console => info!("💬 {}", message),
            CommandSender::Player(id) => info!("💬 -> {}: {}", self.display_name(*id), message),
        }
    }
}
