//! Safety checks for sampled candidates.

use crate::policy::SpawnPolicy;
use crate::sampler::Candidate;
use crate::terrain::Terrain;
use crate::types::BlockPos;

/// Decides whether a candidate is survivable to occupy.
///
/// A candidate drawn for a different (or unnamed) world than `world` is never
/// safe. In forced-ground mode every other candidate passes provisionally; the
/// ground scan establishes the real standing point. Otherwise the cell and the
/// one above must be passable and the cell below must be [`standable`].
/// A cell at the edge of the `i32` range has no such neighbours and is unsafe.
pub fn is_safe<W>(world: &W, candidate: &Candidate<'_>, policy: &SpawnPolicy) -> bool
where
    W: Terrain + ?Sized,
{
    if candidate.world.is_empty() || candidate.world != world.name() {
        return false;
    }

    if policy.force_ground_spawn() {
        return true;
    }

    let pos = candidate.pos;
    let (Some(head), Some(floor)) = (pos.up(1), pos.below()) else {
        return false;
    };
    world.is_passable(pos) && world.is_passable(head) && standable(world, floor, policy)
}

/// Solid, not a liquid and not made of a fatal material.
pub fn standable<W>(world: &W, pos: BlockPos, policy: &SpawnPolicy) -> bool
where
    W: Terrain + ?Sized,
{
    !world.is_passable(pos) && !world.is_liquid(pos) && !policy.is_fatal(world.material_of(pos))
}
