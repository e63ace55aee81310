//! Host server interface.
//!
//! Everything the plugin needs from the server it runs in: world lookup,
//! player state, permissions and the side effects placement triggers.

use crate::error::PluginError;
use crate::events::{CommandSender, PlayerId};
use async_trait::async_trait;
use spawn_engine::{Location, Terrain};
use std::sync::Arc;

#[async_trait]
pub trait SpawnHost: Send + Sync {
    /// Names of the loaded worlds, primary world first.
    fn worlds(&self) -> Vec<String>;

    /// Terrain view of a loaded world.
    fn terrain(&self, world: &str) -> Option<Arc<dyn Terrain>>;

    /// World the player is currently in.
    fn world_of(&self, player: PlayerId) -> Option<String>;

    fn is_online(&self, player: PlayerId) -> bool;

    fn has_permission(&self, sender: &CommandSender, permission: &str) -> bool;

    async fn teleport(&self, player: PlayerId, location: Location) -> Result<(), PluginError>;

    /// Moves the player to another server of the network.
    async fn transfer(&self, player: PlayerId, server: &str) -> Result<(), PluginError>;

    async fn send_message(&self, recipient: &CommandSender, message: &str);
}
