//! # Spawn Policy
//!
//! An immutable snapshot of everything selection needs to know: the sampling
//! region, the spawn mode, the retry budget and the terrain considered fatal.
//!
//! A policy is built once per configuration load and never mutated. Reloading
//! swaps in a whole new snapshot (see
//! [`SpawnSelector::on_policy_reload`](crate::SpawnSelector::on_policy_reload)),
//! so a selection in flight always reads one consistent policy.

use crate::error::PolicyError;
use crate::types::Region;
use std::collections::{BTreeSet, HashSet};

/// Materials that make a cell unsafe to stand on, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FatalBlocks(HashSet<String>);

impl FatalBlocks {
    pub fn new<I, S>(materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            materials
                .into_iter()
                .map(|m| m.as_ref().trim().to_ascii_uppercase())
                .collect(),
        )
    }

    pub fn contains(&self, material: &str) -> bool {
        self.0.contains(&material.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPolicy {
    region: Region,
    force_ground_spawn: bool,
    max_tries: u32,
    fatal_blocks: FatalBlocks,
    enabled_worlds: BTreeSet<String>,
    first_join_enabled: bool,
    respawn_on_death_enabled: bool,
    transfer_server_name: Option<String>,
}

impl SpawnPolicy {
    pub fn builder() -> SpawnPolicyBuilder {
        SpawnPolicyBuilder::default()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn force_ground_spawn(&self) -> bool {
        self.force_ground_spawn
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn fatal_blocks(&self) -> &FatalBlocks {
        &self.fatal_blocks
    }

    pub fn is_fatal(&self, material: &str) -> bool {
        self.fatal_blocks.contains(material)
    }

    pub fn enabled_worlds(&self) -> impl Iterator<Item = &str> {
        self.enabled_worlds.iter().map(String::as_str)
    }

    /// World names are matched exactly.
    pub fn is_world_enabled(&self, world: &str) -> bool {
        self.enabled_worlds.contains(world)
    }

    pub fn first_join_enabled(&self) -> bool {
        self.first_join_enabled
    }

    pub fn respawn_on_death_enabled(&self) -> bool {
        self.respawn_on_death_enabled
    }

    /// Server to move an entity to after a random respawn, if any.
    pub fn transfer_server_name(&self) -> Option<&str> {
        self.transfer_server_name.as_deref()
    }
}

/// Builder for [`SpawnPolicy`].
///
/// Defaults match a freshly generated configuration file.
#[derive(Debug, Clone)]
pub struct SpawnPolicyBuilder {
    region: Region,
    force_ground_spawn: bool,
    max_tries: u32,
    fatal_blocks: Vec<String>,
    enabled_worlds: Vec<String>,
    first_join_enabled: bool,
    respawn_on_death_enabled: bool,
    transfer_server_name: Option<String>,
}

impl Default for SpawnPolicyBuilder {
    fn default() -> Self {
        Self {
            region: Region::default(),
            force_ground_spawn: false,
            max_tries: 50,
            fatal_blocks: Vec::new(),
            enabled_worlds: Vec::new(),
            first_join_enabled: true,
            respawn_on_death_enabled: true,
            transfer_server_name: None,
        }
    }
}

impl SpawnPolicyBuilder {
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn force_ground_spawn(mut self, enabled: bool) -> Self {
        self.force_ground_spawn = enabled;
        self
    }

    pub fn max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn fatal_blocks<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fatal_blocks = materials.into_iter().map(Into::into).collect();
        self
    }

    pub fn enabled_worlds<I, S>(mut self, worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_worlds = worlds.into_iter().map(Into::into).collect();
        self
    }

    pub fn first_join_enabled(mut self, enabled: bool) -> Self {
        self.first_join_enabled = enabled;
        self
    }

    pub fn respawn_on_death_enabled(mut self, enabled: bool) -> Self {
        self.respawn_on_death_enabled = enabled;
        self
    }

    /// An empty or whitespace-only name disables transfers.
    pub fn transfer_server_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.transfer_server_name = name.map(Into::into);
        self
    }

    pub fn build(self) -> Result<SpawnPolicy, PolicyError> {
        if self.max_tries == 0 {
            return Err(PolicyError::ZeroTries);
        }
        if self.fatal_blocks.iter().any(|m| m.trim().is_empty()) {
            return Err(PolicyError::BlankMaterial);
        }
        if self.enabled_worlds.iter().any(|w| w.trim().is_empty()) {
            return Err(PolicyError::BlankWorld);
        }

        Ok(SpawnPolicy {
            region: self.region,
            force_ground_spawn: self.force_ground_spawn,
            max_tries: self.max_tries,
            fatal_blocks: FatalBlocks::new(&self.fatal_blocks),
            enabled_worlds: self.enabled_worlds.into_iter().collect(),
            first_join_enabled: self.first_join_enabled,
            respawn_on_death_enabled: self.respawn_on_death_enabled,
            transfer_server_name: self
                .transfer_server_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        })
    }
}
