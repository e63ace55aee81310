//! # Plugin Event Types
//!
//! Event payloads the host hands to the plugin. They mirror the host's own
//! join, respawn and command notifications, trimmed to what placement needs.

use serde::{Deserialize, Serialize};
use spawn_engine::Location;
use uuid::Uuid;

/// Unique identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandSender {
    Console,
    Player(PlayerId),
}

/// A player finished joining the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinEvent {
    pub player_id: PlayerId,
    /// `false` on the player's first ever join
    pub has_played_before: bool,
}

/// A player is about to respawn after death.
///
/// Handlers may replace `respawn_location`; `None` keeps the host default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRespawnEvent {
    pub player_id: PlayerId,
    /// World the player is respawning in
    pub world: String,
    /// The respawn was claimed by the player's bed
    pub is_bed_spawn: bool,
    /// The respawn was claimed by a respawn anchor
    pub is_anchor_spawn: bool,
    pub respawn_location: Option<Location>,
}

impl PlayerRespawnEvent {
    pub fn new(player_id: PlayerId, world: impl Into<String>) -> Self {
        Self {
            player_id,
            world: world.into(),
            is_bed_spawn: false,
            is_anchor_spawn: false,
            respawn_location: None,
        }
    }
}

/// A command line addressed to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    pub sender: CommandSender,
    pub label: String,
    pub args: Vec<String>,
}

impl CommandEvent {
    /// Splits a raw command line (`/rd reload`, `random`) into label and args.
    ///
    /// Returns `None` for a blank line.
    pub fn parse(sender: CommandSender, line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let label = parts.next()?.trim_start_matches('/').to_string();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            sender,
            label,
            args: parts.map(str::to_string).collect(),
        })
    }
}
