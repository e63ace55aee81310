//! # Spawn Engine
//!
//! Picks a pseudo-random, survivable position inside a bounded region of a
//! voxel world and keeps a small per-world pool of known-good positions to
//! fall back on when live sampling keeps failing.
//!
//! ## Components
//!
//! | Module        | Role                                                      |
//! |---------------|-----------------------------------------------------------|
//! | [`sampler`]   | Uniform coordinate draws with bound normalization         |
//! | [`validator`] | Free-fall and forced-ground safety predicates             |
//! | [`ground`]    | Downward column scan for a standable surface              |
//! | [`cache`]     | Bounded per-world safe-location pool with random eviction |
//! | [`selector`]  | Retry loop tying the pieces together                      |
//!
//! Terrain is read through the [`Terrain`] trait; hosts implement it over their
//! own world storage. All randomness flows through [`RandomSource`] so tests
//! can pin exact outputs.
//!
//! ## Example
//!
//! ```rust
//! use spawn_engine::{MemoryTerrain, Region, SpawnPolicy, SpawnSelector};
//!
//! let world = MemoryTerrain::new("world", 256).with_layer(63, 63, "STONE");
//! let policy = SpawnPolicy::builder()
//!     .region(Region::new(-10, 10, 64, 64, -10, 10))
//!     .enabled_worlds(["world"])
//!     .build()?;
//!
//! let selector = SpawnSelector::new(policy);
//! let location = selector.select(&world).into_location().expect("flat world has room");
//! assert_eq!(location.y, 64.0);
//! # Ok::<(), spawn_engine::PolicyError>(())
//! ```
//!
//! ## Failure Model
//!
//! Selection never errors. A rejected candidate just drives the retry loop,
//! exhausted retries fall back to the cache, and a disabled world or an empty
//! cache yields `None`. Callers treat `None` as "leave the entity where it is".

pub mod cache;
pub mod error;
pub mod ground;
pub mod policy;
pub mod random;
pub mod sampler;
pub mod selector;
pub mod terrain;
pub mod types;
pub mod validator;

pub use cache::{SafeLocationCache, SAFE_LOCATION_CAPACITY};
pub use error::PolicyError;
pub use ground::find_ground;
pub use policy::{FatalBlocks, SpawnPolicy, SpawnPolicyBuilder};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use sampler::{random_between, sample_candidate, Candidate};
pub use selector::{SelectionOutcome, SpawnSelector};
pub use terrain::{is_air_material, is_liquid_material, Layer, MemoryTerrain, Terrain, AIR};
pub use types::{BlockPos, Location, Region};
pub use validator::{is_safe, standable};
