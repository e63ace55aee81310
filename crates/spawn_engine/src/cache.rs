//! # Safe-Location Cache
//!
//! A bounded, per-world pool of locations that already passed validation.
//! The selector falls back to it when live sampling runs out of attempts.
//!
//! ## Behaviour
//!
//! - Each world holds at most [`SAFE_LOCATION_CAPACITY`] distinct locations.
//! - Recording into a full world inserts first, then evicts one member chosen
//!   uniformly at random. The evicted member may be the one just inserted.
//! - [`SafeLocationCache::clear`] empties every world and advances the cache
//!   epoch. Records tagged with an older epoch are dropped, so a selection
//!   that started under a previous policy cannot repopulate the cache.
//!
//! ## Thread Safety
//!
//! Worlds live in a `DashMap`. A record holds its shard's write lock across
//! insert and eviction, so readers only ever observe complete sets.

use crate::random::RandomSource;
use crate::types::Location;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Maximum number of safe locations kept per world.
pub const SAFE_LOCATION_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct SafeLocationCache {
    worlds: DashMap<String, Vec<Location>>,
    capacity: usize,
    epoch: AtomicU64,
}

impl SafeLocationCache {
    pub fn new() -> Self {
        Self::with_capacity(SAFE_LOCATION_CAPACITY)
    }

    /// A cache bounded to `capacity` entries per world (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            worlds: DashMap::new(),
            capacity: capacity.max(1),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current epoch; advanced by every [`clear`](Self::clear).
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Stores a copy of `location` under `world` in the current epoch.
    pub fn record(&self, world: &str, location: &Location, rng: &dyn RandomSource) -> bool {
        self.record_at(self.epoch(), world, location, rng)
    }

    /// Stores a copy of `location` unless the cache was cleared since `epoch`.
    ///
    /// Returns `false` when the record was discarded as stale.
    pub fn record_at(
        &self,
        epoch: u64,
        world: &str,
        location: &Location,
        rng: &dyn RandomSource,
    ) -> bool {
        let entry = self.worlds.entry(world.to_string());

        // Checked under the shard lock: a concurrent clear either bumped the
        // epoch already or has yet to wipe this shard. A stale record leaves
        // no entry behind.
        if self.epoch.load(Ordering::SeqCst) != epoch {
            trace!("Discarding stale safe location for world '{}'", world);
            return false;
        }

        let mut locations = entry.or_default();

        if !locations.contains(location) {
            locations.push(location.clone());
        }

        if locations.len() > self.capacity {
            let victim = rng.index(locations.len());
            locations.swap_remove(victim);
        }

        true
    }

    /// One stored location for `world`, chosen uniformly at random.
    pub fn sample_fallback(&self, world: &str, rng: &dyn RandomSource) -> Option<Location> {
        let locations = self.worlds.get(world)?;
        if locations.is_empty() {
            return None;
        }
        Some(locations[rng.index(locations.len())].clone())
    }

    /// Empties every world and starts a new epoch.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.worlds.clear();
    }

    /// Number of locations stored for `world`.
    pub fn len(&self, world: &str) -> usize {
        self.worlds.get(world).map_or(0, |locations| locations.len())
    }

    /// Snapshot of the locations stored for `world`.
    pub fn locations(&self, world: &str) -> Vec<Location> {
        self.worlds
            .get(world)
            .map(|locations| locations.value().clone())
            .unwrap_or_default()
    }

    /// `(world, count)` pairs for every world with at least one entry.
    pub fn summary(&self) -> Vec<(String, usize)> {
        let mut summary: Vec<_> = self
            .worlds
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect();
        summary.sort();
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.iter().all(|entry| entry.value().is_empty())
    }
}

impl Default for SafeLocationCache {
    fn default() -> Self {
        Self::new()
    }
}
