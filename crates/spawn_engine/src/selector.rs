//! # Spawn Selector
//!
//! Orchestrates sampling, validation, ground refinement and the fallback
//! cache into a single location-selection operation.
//!
//! ## Selection Flow
//!
//! ```text
//! Sampling ──► Validating ──rejected──► Sampling (next attempt)
//!    │              │
//!    │              ├─accepted, forced ground──► Refining ──no ground──► Sampling
//!    │              │                               │
//!    │              └─accepted──────────────────────┴──► Succeeded
//!    │
//!    └─attempts used up──► Exhausted ──► FallingBack ──cache hit──► fallback location
//!                                             └──cache empty──► Failed
//! ```
//!
//! Every step is bounded: at most `max_tries` attempts, each a few terrain
//! reads plus, in forced-ground mode, one column scan. Nothing blocks.
//!
//! ## Reloads
//!
//! The current policy sits behind an `ArcSwap`. [`SpawnSelector::on_policy_reload`]
//! publishes the new snapshot and then clears the cache. A selection reads the
//! cache epoch and only then checks that its snapshot is still the current one.
//! A snapshot replaced before that check never records; one replaced after it
//! records under an epoch the clear has already retired, so the record is
//! discarded as stale.

use crate::cache::SafeLocationCache;
use crate::ground::find_ground;
use crate::policy::SpawnPolicy;
use crate::random::{RandomSource, ThreadRandom};
use crate::sampler::{sample_candidate, Candidate};
use crate::terrain::Terrain;
use crate::types::{BlockPos, Location};
use crate::validator::is_safe;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of one selection, with enough detail for callers to log it.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// A fresh location was validated on attempt number `attempts`.
    Placed { location: Location, attempts: u32 },
    /// Every attempt failed; this location came from the safe-location cache.
    Fallback(Location),
    /// Every attempt failed and the cache had nothing for this world.
    Unavailable { attempts: u32 },
    /// The world is not enabled in the policy. Nothing was sampled.
    WorldDisabled,
}

impl SelectionOutcome {
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Placed { location, .. } | Self::Fallback(location) => Some(location),
            Self::Unavailable { .. } | Self::WorldDisabled => None,
        }
    }

    pub fn into_location(self) -> Option<Location> {
        match self {
            Self::Placed { location, .. } | Self::Fallback(location) => Some(location),
            Self::Unavailable { .. } | Self::WorldDisabled => None,
        }
    }
}

/// States of the retry-then-fallback loop. `attempt` counts from zero.
#[derive(Debug, Clone, Copy)]
enum SelectionState<'a> {
    Sampling { attempt: u32 },
    Validating { attempt: u32, candidate: Candidate<'a> },
    Refining { attempt: u32, candidate: Candidate<'a> },
    Succeeded { attempt: u32, pos: BlockPos },
    Exhausted { attempts: u32 },
    FallingBack { attempts: u32 },
    Failed { attempts: u32 },
}

/// Picks spawn locations and owns the safe-location cache.
///
/// Shareable across threads behind an `Arc`; every method takes `&self`.
pub struct SpawnSelector {
    policy: ArcSwap<SpawnPolicy>,
    cache: SafeLocationCache,
    rng: Arc<dyn RandomSource>,
}

impl SpawnSelector {
    pub fn new(policy: SpawnPolicy) -> Self {
        Self::with_random(policy, Arc::new(ThreadRandom))
    }

    /// A selector drawing every random value from `rng`.
    pub fn with_random(policy: SpawnPolicy, rng: Arc<dyn RandomSource>) -> Self {
        Self {
            policy: ArcSwap::from_pointee(policy),
            cache: SafeLocationCache::new(),
            rng,
        }
    }

    /// The current policy snapshot.
    pub fn policy(&self) -> Arc<SpawnPolicy> {
        self.policy.load_full()
    }

    pub fn cache(&self) -> &SafeLocationCache {
        &self.cache
    }

    /// Adopts `policy` and clears the safe-location cache.
    ///
    /// Selections already running finish against the snapshot they loaded.
    pub fn on_policy_reload(&self, policy: SpawnPolicy) {
        self.policy.store(Arc::new(policy));
        self.cache.clear();
        debug!("Spawn policy replaced, safe-location cache cleared");
    }

    /// Selects a location in `world` under the current policy.
    pub fn select<W>(&self, world: &W) -> SelectionOutcome
    where
        W: Terrain + ?Sized,
    {
        self.select_outcome(world, &self.policy.load_full())
    }

    /// Selects a location in `world` under an explicit policy snapshot.
    pub fn select_spawn<W>(&self, world: &W, policy: &Arc<SpawnPolicy>) -> Option<Location>
    where
        W: Terrain + ?Sized,
    {
        self.select_outcome(world, policy).into_location()
    }

    /// Like [`select_spawn`](Self::select_spawn), reporting how the result
    /// was reached.
    ///
    /// Only a snapshot that is still current feeds the cache. Locations found
    /// under a replaced policy are returned but never recorded.
    pub fn select_outcome<W>(&self, world: &W, policy: &Arc<SpawnPolicy>) -> SelectionOutcome
    where
        W: Terrain + ?Sized,
    {
        let epoch = self.cache.epoch();
        let record_epoch = Arc::ptr_eq(policy, &*self.policy.load()).then_some(epoch);
        self.run(world, policy, record_epoch)
    }

    fn run<W>(&self, world: &W, policy: &SpawnPolicy, record_epoch: Option<u64>) -> SelectionOutcome
    where
        W: Terrain + ?Sized,
    {
        let world_name = world.name();
        if !policy.is_world_enabled(world_name) {
            trace!("World '{}' is not enabled for random spawns", world_name);
            return SelectionOutcome::WorldDisabled;
        }

        let rng = self.rng.as_ref();
        let mut state = SelectionState::Sampling { attempt: 0 };

        loop {
            state = match state {
                SelectionState::Sampling { attempt } if attempt >= policy.max_tries() => {
                    SelectionState::Exhausted { attempts: attempt }
                }
                SelectionState::Sampling { attempt } => SelectionState::Validating {
                    attempt,
                    candidate: sample_candidate(
                        rng,
                        world,
                        policy.region(),
                        policy.force_ground_spawn(),
                    ),
                },
                SelectionState::Validating { attempt, candidate } => {
                    if !is_safe(world, &candidate, policy) {
                        SelectionState::Sampling { attempt: attempt + 1 }
                    } else if policy.force_ground_spawn() {
                        SelectionState::Refining { attempt, candidate }
                    } else {
                        SelectionState::Succeeded { attempt, pos: candidate.pos }
                    }
                }
                SelectionState::Refining { attempt, candidate } => {
                    match find_ground(world, candidate.pos.x, candidate.pos.z, policy) {
                        Some(pos) => SelectionState::Succeeded { attempt, pos },
                        None => SelectionState::Sampling { attempt: attempt + 1 },
                    }
                }
                SelectionState::Succeeded { attempt, pos } => {
                    let yaw = rng.unit() * 360.0;
                    let location = Location::centered(world_name, pos, yaw);
                    if let Some(epoch) = record_epoch {
                        self.cache.record_at(epoch, world_name, &location, rng);
                    }
                    trace!("Selected {} after {} attempt(s)", location, attempt + 1);
                    return SelectionOutcome::Placed {
                        location,
                        attempts: attempt + 1,
                    };
                }
                SelectionState::Exhausted { attempts } => {
                    debug!(
                        "No safe location in '{}' after {} attempts, trying cache",
                        world_name, attempts
                    );
                    SelectionState::FallingBack { attempts }
                }
                SelectionState::FallingBack { attempts } => {
                    match self.cache.sample_fallback(world_name, rng) {
                        Some(location) => return SelectionOutcome::Fallback(location),
                        None => SelectionState::Failed { attempts },
                    }
                }
                SelectionState::Failed { attempts } => {
                    debug!("No cached location for '{}' either", world_name);
                    return SelectionOutcome::Unavailable { attempts };
                }
            };
        }
    }
}

impl std::fmt::Debug for SpawnSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnSelector")
            .field("policy", &*self.policy.load_full())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
