//! # First-Join Handler
//!
//! Sends brand-new players to a random location. The teleport runs a few
//! ticks after the join so the host has finished loading the player.

use crate::events::{PlayerId, PlayerJoinEvent};
use crate::host::SpawnHost;
use spawn_engine::{SelectionOutcome, SpawnSelector};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Schedules a random teleport for a first-time player.
///
/// Returns the handle of the scheduled task, or `None` when the player has
/// joined before or first-join placement is disabled.
pub fn handle_player_join(
    event: &PlayerJoinEvent,
    selector: Arc<SpawnSelector>,
    host: Arc<dyn SpawnHost>,
    delay: Duration,
) -> Option<JoinHandle<()>> {
    if event.has_played_before || !selector.policy().first_join_enabled() {
        return None;
    }

    let player = event.player_id;
    debug!("🎲 RandomSpawn: Scheduling first-join placement for {}", player);

    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if !host.is_online(player) {
            debug!("🎲 RandomSpawn: {} left before placement", player);
            return;
        }

        teleport_to_random_spawn(player, &selector, host.as_ref()).await;
    }))
}

async fn teleport_to_random_spawn(player: PlayerId, selector: &SpawnSelector, host: &dyn SpawnHost) {
    let Some(world) = host.world_of(player) else {
        warn!("🎲 RandomSpawn: No world known for player {}", player);
        return;
    };
    let Some(terrain) = host.terrain(&world) else {
        warn!("🎲 RandomSpawn: World '{}' is not loaded", world);
        return;
    };

    let outcome = selector.select(&*terrain);
    if let SelectionOutcome::Unavailable { attempts } = outcome {
        debug!(
            "🎲 RandomSpawn: No spawn found for {} in '{}' after {} attempts",
            player, world, attempts
        );
    }

    if let Some(location) = outcome.into_location() {
        debug!("🎲 RandomSpawn: Teleporting {} to {}", player, location);
        if let Err(e) = host.teleport(player, location).await {
            error!("🎲 RandomSpawn: ❌ Teleport of {} failed: {}", player, e);
        }
    }
}
