//! Ground detection for forced-ground spawns.

use crate::policy::SpawnPolicy;
use crate::terrain::Terrain;
use crate::types::BlockPos;
use crate::validator::standable;

/// Scans the `(x, z)` column from `max_height - 1` down to `y = 1` and returns
/// the standing cell above the first standable block with two passable cells
/// on top of it.
///
/// `None` means the column has no usable surface; the caller treats that as a
/// rejected candidate.
pub fn find_ground<W>(world: &W, x: i32, z: i32, policy: &SpawnPolicy) -> Option<BlockPos>
where
    W: Terrain + ?Sized,
{
    (1..world.max_height())
        .rev()
        .map(|y| BlockPos::new(x, y, z))
        .find_map(|pos| {
            let feet = pos.up(1)?;
            let head = pos.up(2)?;
            (standable(world, pos, policy) && world.is_passable(feet) && world.is_passable(head))
                .then_some(feet)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::MemoryTerrain;

    fn policy() -> SpawnPolicy {
        SpawnPolicy::builder()
            .force_ground_spawn(true)
            .fatal_blocks(["LAVA", "MAGMA_BLOCK"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_finds_floor_surface() {
        let world = MemoryTerrain::new("world", 256).with_layer(63, 63, "STONE");
        assert_eq!(find_ground(&world, 4, -7, &policy()), Some(BlockPos::new(4, 64, -7)));
    }

    #[test]
    fn test_topmost_surface_wins() {
        let mut world = MemoryTerrain::new("world", 256).with_layer(0, 63, "STONE");
        world.set_block(BlockPos::new(0, 100, 0), "OAK_LEAVES");
        assert_eq!(find_ground(&world, 0, 0, &policy()), Some(BlockPos::new(0, 101, 0)));
    }

    #[test]
    fn test_skips_fatal_liquid_and_cramped_cells() {
        let mut world = MemoryTerrain::new("world", 256).with_layer(0, 40, "STONE");
        // Magma with headroom, open water, then stone capped by magma one cell up.
        world.set_block(BlockPos::new(0, 90, 0), "MAGMA_BLOCK");
        world.set_block(BlockPos::new(0, 80, 0), "WATER");
        world.set_block(BlockPos::new(0, 50, 0), "STONE");
        world.set_block(BlockPos::new(0, 52, 0), "MAGMA_BLOCK");
        assert_eq!(find_ground(&world, 0, 0, &policy()), Some(BlockPos::new(0, 41, 0)));
    }

    #[test]
    fn test_solid_fatal_column_yields_none() {
        let mut world = MemoryTerrain::new("world", 64);
        world.fill_column(3, 3, 0, 63, "LAVA");
        assert_eq!(find_ground(&world, 3, 3, &policy()), None);

        let mut world = MemoryTerrain::new("world", 64);
        world.fill_column(3, 3, 1, 63, "MAGMA_BLOCK");
        assert_eq!(find_ground(&world, 3, 3, &policy()), None);
    }

    #[test]
    fn test_y_zero_is_never_accepted() {
        let world = MemoryTerrain::new("world", 64).with_layer(0, 0, "BEDROCK");
        assert_eq!(find_ground(&world, 0, 0, &policy()), None);
    }
}
