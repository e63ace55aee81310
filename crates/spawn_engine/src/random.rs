//! Randomness sources.
//!
//! Every random choice the engine makes (coordinates, yaw, cache picks) goes
//! through [`RandomSource`] so tests can substitute a deterministic sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform random values, shareable across threads.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[low, high]`. Callers guarantee `low <= high`.
    fn int_inclusive(&self, low: i32, high: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn unit(&self) -> f32;

    /// Uniform index in `[0, len)`. Callers guarantee `len > 0`.
    fn index(&self, len: usize) -> usize;
}

/// Default source backed by the thread-local generator. Needs no locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn int_inclusive(&self, low: i32, high: i32) -> i32 {
        rand::thread_rng().gen_range(low..=high)
    }

    fn unit(&self) -> f32 {
        rand::thread_rng().gen::<f32>()
    }

    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible source for tests and tooling.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave an StdRng half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl RandomSource for SeededRandom {
    fn int_inclusive(&self, low: i32, high: i32) -> i32 {
        self.with_rng(|rng| rng.gen_range(low..=high))
    }

    fn unit(&self) -> f32 {
        self.with_rng(|rng| rng.gen::<f32>())
    }

    fn index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len))
    }
}
