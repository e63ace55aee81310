//! # Event Handlers
//!
//! One module per host notification the plugin reacts to.
//!
//! - [`join`] - First-join placement, delayed until the player is loaded
//! - [`respawn`] - Death respawn placement and optional server transfer
//! - [`command`] - The `/rd` and `/random` administrative command

pub mod command;
pub mod join;
pub mod respawn;

pub use command::*;
pub use join::*;
pub use respawn::*;

/// Length of one server tick.
pub const TICK: std::time::Duration = std::time::Duration::from_millis(50);

/// Delay before acting on a freshly joined or respawned player (5 ticks).
pub const PLAYER_SETTLE_DELAY: std::time::Duration = std::time::Duration::from_millis(5 * 50);
