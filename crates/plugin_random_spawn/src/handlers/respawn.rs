//! # Death Respawn Handler
//!
//! Replaces the respawn point of players who died without a bed or respawn
//! anchor, and optionally hands them to another server afterwards.

use crate::events::PlayerRespawnEvent;
use crate::host::SpawnHost;
use spawn_engine::SpawnSelector;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Sets a random respawn location on `event` when the policy allows it.
///
/// Bed and anchor respawns are never overridden. Every decision, selection
/// included, is made against one policy snapshot. When a transfer server is
/// configured and a location was chosen, the transfer is scheduled after
/// `delay` and its task handle returned.
pub fn handle_player_respawn(
    event: &mut PlayerRespawnEvent,
    selector: &SpawnSelector,
    host: Arc<dyn SpawnHost>,
    delay: Duration,
) -> Option<JoinHandle<()>> {
    let policy = selector.policy();
    if !policy.respawn_on_death_enabled() || event.is_bed_spawn || event.is_anchor_spawn {
        return None;
    }
    if !policy.is_world_enabled(&event.world) {
        return None;
    }

    let Some(terrain) = host.terrain(&event.world) else {
        warn!("🎲 RandomSpawn: World '{}' is not loaded", event.world);
        return None;
    };

    let location = selector.select_outcome(&*terrain, &policy).into_location()?;
    debug!("🎲 RandomSpawn: Respawning {} at {}", event.player_id, location);
    event.respawn_location = Some(location);

    let server = policy.transfer_server_name()?.to_string();
    let player = event.player_id;

    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if !host.is_online(player) {
            return;
        }

        match host.transfer(player, &server).await {
            Ok(()) => info!("🎲 RandomSpawn: Transferred {} to '{}'", player, server),
            Err(e) => error!("🎲 RandomSpawn: ❌ Transfer of {} to '{}' failed: {}", player, server, e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::events::{CommandSender, PlayerId};
    use crate::test_support::{flat_selector, MockHost};
    use async_trait::async_trait;
    use spawn_engine::{Location, Region, SpawnPolicy, Terrain};
    use std::sync::Mutex;

    /// Swaps in `replacement` the moment the handler looks up terrain.
    struct ReloadingHost {
        inner: MockHost,
        selector: Arc<SpawnSelector>,
        replacement: Mutex<Option<SpawnPolicy>>,
    }

    #[async_trait]
    impl SpawnHost for ReloadingHost {
        fn worlds(&self) -> Vec<String> {
            self.inner.worlds()
        }

        fn terrain(&self, world: &str) -> Option<Arc<dyn Terrain>> {
            if let Some(policy) = self.replacement.lock().unwrap().take() {
                self.selector.on_policy_reload(policy);
            }
            self.inner.terrain(world)
        }

        fn world_of(&self, player: PlayerId) -> Option<String> {
            self.inner.world_of(player)
        }

        fn is_online(&self, player: PlayerId) -> bool {
            self.inner.is_online(player)
        }

        fn has_permission(&self, sender: &CommandSender, permission: &str) -> bool {
            self.inner.has_permission(sender, permission)
        }

        async fn teleport(&self, player: PlayerId, location: Location) -> Result<(), PluginError> {
            self.inner.teleport(player, location).await
        }

        async fn transfer(&self, player: PlayerId, server: &str) -> Result<(), PluginError> {
            self.inner.transfer(player, server).await
        }

        async fn send_message(&self, recipient: &CommandSender, message: &str) {
            self.inner.send_message(recipient, message).await
        }
    }

    fn transferring_selector() -> SpawnSelector {
        let policy = SpawnPolicy::builder()
            .region(Region::new(-10, 10, 64, 64, -10, 10))
            .enabled_worlds(["world"])
            .transfer_server_name(Some("lobby"))
            .build()
            .unwrap();
        SpawnSelector::new(policy)
    }

    #[tokio::test]
    async fn test_death_respawn_sets_location() {
        let host = Arc::new(MockHost::new());
        let player = host.add_player("world");
        let mut event = PlayerRespawnEvent::new(player, "world");

        let task = handle_player_respawn(&mut event, &flat_selector(true), host.clone(), Duration::ZERO);
        assert!(task.is_none(), "no transfer server configured");

        let location = event.respawn_location.expect("respawn location set");
        assert_eq!(location.world, "world");
        assert_eq!(location.y, 64.0);
        assert!(host.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_bed_and_anchor_respawns_are_kept() {
        let host = Arc::new(MockHost::new());
        let player = host.add_player("world");
        let selector = flat_selector(true);

        let mut bed = PlayerRespawnEvent::new(player, "world");
        bed.is_bed_spawn = true;
        handle_player_respawn(&mut bed, &selector, host.clone(), Duration::ZERO);
        assert!(bed.respawn_location.is_none());

        let mut anchor = PlayerRespawnEvent::new(player, "world");
        anchor.is_anchor_spawn = true;
        handle_player_respawn(&mut anchor, &selector, host.clone(), Duration::ZERO);
        assert!(anchor.respawn_location.is_none());
    }

    #[tokio::test]
    async fn test_disabled_world_is_ignored() {
        let host = Arc::new(MockHost::new());
        let player = host.add_player("world_nether");
        let mut event = PlayerRespawnEvent::new(player, "world_nether");

        handle_player_respawn(&mut event, &flat_selector(true), host.clone(), Duration::ZERO);
        assert!(event.respawn_location.is_none());
    }

    #[tokio::test]
    async fn test_respawn_transfers_when_configured() {
        let host = Arc::new(MockHost::new());
        let player = host.add_player("world");
        let mut event = PlayerRespawnEvent::new(player, "world");

        let task = handle_player_respawn(&mut event, &transferring_selector(), host.clone(), Duration::ZERO)
            .expect("transfer scheduled");
        task.await.unwrap();

        assert!(event.respawn_location.is_some());
        assert_eq!(host.transfers(), vec![(player, "lobby".to_string())]);
    }

    #[tokio::test]
    async fn test_reload_during_respawn_keeps_one_snapshot() {
        let selector = Arc::new(transferring_selector());
        let moved = SpawnPolicy::builder()
            .region(Region::new(500, 510, 64, 64, 500, 510))
            .enabled_worlds(["world"])
            .build()
            .unwrap();
        let host = Arc::new(ReloadingHost {
            inner: MockHost::new(),
            selector: Arc::clone(&selector),
            replacement: Mutex::new(Some(moved)),
        });
        let player = host.inner.add_player("world");
        let mut event = PlayerRespawnEvent::new(player, "world");

        let task = handle_player_respawn(&mut event, &selector, host.clone(), Duration::ZERO)
            .expect("transfer comes from the snapshot the respawn started with");
        task.await.unwrap();

        let location = event.respawn_location.unwrap();
        assert!((-10.0..=11.0).contains(&location.x));
        assert!(selector.cache().is_empty());
        assert_eq!(selector.policy().region().x_bounds(), (500, 510));
        assert_eq!(host.inner.transfers(), vec![(player, "lobby".to_string())]);
    }

    #[tokio::test]
    async fn test_offline_player_is_not_transferred() {
        let host = Arc::new(MockHost::new());
        let player = host.add_player("world");
        host.set_online(player, false);
        let mut event = PlayerRespawnEvent::new(player, "world");

        let task = handle_player_respawn(&mut event, &transferring_selector(), host.clone(), Duration::ZERO).unwrap();
        task.await.unwrap();
        assert!(host.transfers().is_empty());
    }
}
