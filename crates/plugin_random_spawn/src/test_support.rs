//! In-memory host used by the plugin's tests.

use crate::error::PluginError;
use crate::events::{CommandSender, PlayerId};
use crate::host::SpawnHost;
use async_trait::async_trait;
use spawn_engine::{Location, MemoryTerrain, Region, SpawnPolicy, SpawnSelector, Terrain};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Stone up to y = 63, so every column has a safe cell at y = 64.
pub fn flat_world(name: &str) -> MemoryTerrain {
    MemoryTerrain::new(name, 256).with_layer(0, 63, "STONE")
}

/// A selector over a tiny region of `world`, where every candidate is safe.
pub fn flat_selector(first_join: bool) -> Arc<SpawnSelector> {
    let policy = SpawnPolicy::builder()
        .region(Region::new(-10, 10, 64, 64, -10, 10))
        .enabled_worlds(["world"])
        .first_join_enabled(first_join)
        .build()
        .unwrap();
    Arc::new(SpawnSelector::new(policy))
}

pub struct MockHost {
    worlds: Vec<Arc<MemoryTerrain>>,
    players: Mutex<HashMap<PlayerId, (String, bool)>>,
    teleports: Mutex<Vec<(PlayerId, Location)>>,
    transfers: Mutex<Vec<(PlayerId, String)>>,
    messages: Mutex<Vec<(CommandSender, String)>>,
    allow_permissions: AtomicBool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            worlds: vec![
                Arc::new(flat_world("world")),
                Arc::new(flat_world("world_nether")),
            ],
            players: Mutex::new(HashMap::new()),
            teleports: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            allow_permissions: AtomicBool::new(true),
        }
    }

    pub fn add_player(&self, world: &str) -> PlayerId {
        let id = PlayerId::new();
        self.players.lock().unwrap().insert(id, (world.to_string(), true));
        id
    }

    pub fn set_online(&self, player: PlayerId, online: bool) {
        if let Some(entry) = self.players.lock().unwrap().get_mut(&player) {
            entry.1 = online;
        }
    }

    pub fn deny_permissions(&self) {
        self.allow_permissions.store(false, Ordering::SeqCst);
    }

    pub fn teleports(&self) -> Vec<(PlayerId, Location)> {
        self.teleports.lock().unwrap().clone()
    }

    pub fn transfers(&self) -> Vec<(PlayerId, String)> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(CommandSender, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpawnHost for MockHost {
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
        self.players.lock().unwrap().get(&player).map(|(w, _)| w.clone())
    }

    fn is_online(&self, player: PlayerId) -> bool {
        self.players.lock().unwrap().get(&player).is_some_and(|(_, online)| *online)
    }

    fn has_permission(&self, sender: &CommandSender, _permission: &str) -> bool {
        matches!(sender, CommandSender::Console) || self.allow_permissions.load(Ordering::SeqCst)
    }

    async fn teleport(&self, player: PlayerId, location: Location) -> Result<(), PluginError> {
        self.teleports.lock().unwrap().push((player, location));
        Ok(())
    }

    async fn transfer(&self, player: PlayerId, server: &str) -> Result<(), PluginError> {
        self.transfers.lock().unwrap().push((player, server.to_string()));
        Ok(())
    }

    async fn send_message(&self, recipient: &CommandSender, message: &str) {
        self.messages.lock().unwrap().push((*recipient, message.to_string()));
    }
}
