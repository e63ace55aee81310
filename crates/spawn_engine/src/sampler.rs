//! Coordinate sampling.

use crate::random::RandomSource;
use crate::terrain::Terrain;
use crate::types::{BlockPos, Region};

/// Uniform integer in the inclusive range spanned by `min` and `max`.
///
/// The bounds may arrive in either order; they are swapped rather than
/// rejected.
pub fn random_between(rng: &dyn RandomSource, min: i32, max: i32) -> i32 {
    let (low, high) = if min > max { (max, min) } else { (min, max) };
    rng.int_inclusive(low, high)
}

/// A sampled cell together with the world it was drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub world: &'a str,
    pub pos: BlockPos,
}

/// Draws one candidate inside `region` for `world`.
///
/// x and z are always sampled. In forced-ground mode y is pinned to the world
/// ceiling (`max_height - 1`) and the ground scan decides the final height;
/// otherwise y is sampled from the region as well.
pub fn sample_candidate<'a, W>(
    rng: &dyn RandomSource,
    world: &'a W,
    region: &Region,
    force_ground: bool,
) -> Candidate<'a>
where
    W: Terrain + ?Sized,
{
    let x = random_between(rng, region.x_min, region.x_max);
    let z = random_between(rng, region.z_min, region.z_max);
    let y = if force_ground {
        world.max_height().saturating_sub(1)
    } else {
        random_between(rng, region.y_min, region.y_max)
    };

    Candidate {
        world: world.name(),
        pos: BlockPos::new(x, y, z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, ThreadRandom};
    use crate::terrain::MemoryTerrain;

    #[test]
    fn test_random_between_any_order() {
        let rng = ThreadRandom;
        let pairs = [(-5, 5), (5, -5), (0, 0), (i32::MAX - 1, i32::MAX), (100, -100)];
        for (a, b) in pairs {
            for _ in 0..200 {
                let v = random_between(&rng, a, b);
                assert!(v >= a.min(b) && v <= a.max(b), "{v} outside {a}..{b}");
            }
        }
    }

    #[test]
    fn test_forced_ground_pins_y_to_ceiling() {
        let rng = SeededRandom::new(1);
        let world = MemoryTerrain::new("world", 256);
        let region = Region::new(-10, 10, 64, 70, -10, 10);
        for _ in 0..50 {
            let candidate = sample_candidate(&rng, &world, &region, true);
            assert_eq!(candidate.pos.y, 255);
            assert_eq!(candidate.world, "world");
            assert!((-10..=10).contains(&candidate.pos.x));
            assert!((-10..=10).contains(&candidate.pos.z));
        }
    }

    #[test]
    fn test_free_candidates_stay_in_region() {
        let rng = SeededRandom::new(2);
        let world = MemoryTerrain::new("world", 256);
        let region = Region::new(10, -10, 70, 64, 10, -10);
        for _ in 0..200 {
            let candidate = sample_candidate(&rng, &world, &region, false);
            assert!(region.contains(candidate.pos));
        }
    }
}
