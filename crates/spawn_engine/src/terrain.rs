//! # Terrain Queries
//!
//! The engine never owns world data. It reads terrain through the [`Terrain`]
//! trait, which a host implements over its own block storage.
//!
//! [`MemoryTerrain`] is a small superflat-style implementation: full-width
//! horizontal layers plus sparse per-block overrides. Tests and the dry-run
//! host use it; real servers plug in their own world type.

use crate::types::BlockPos;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Material identifier of an empty cell.
pub const AIR: &str = "AIR";

const AIR_MATERIALS: [&str; 3] = [AIR, "CAVE_AIR", "VOID_AIR"];
const LIQUID_MATERIALS: [&str; 2] = ["WATER", "LAVA"];

/// Returns `true` for air-equivalent material identifiers (case-insensitive).
pub fn is_air_material(material: &str) -> bool {
    AIR_MATERIALS.iter().any(|m| m.eq_ignore_ascii_case(material))
}

/// Returns `true` for liquid material identifiers (case-insensitive).
pub fn is_liquid_material(material: &str) -> bool {
    LIQUID_MATERIALS.iter().any(|m| m.eq_ignore_ascii_case(material))
}

/// Read-only view of one world's terrain.
///
/// Implementations must be cheap to query; the selector performs a handful of
/// lookups per attempt and a full column scan in forced-ground mode.
pub trait Terrain: Send + Sync {
    /// Name of the world, used as the cache key and for enabled-world checks.
    fn name(&self) -> &str;

    /// Exclusive upper build limit. The ground scan starts at `max_height() - 1`.
    fn max_height(&self) -> i32;

    /// Material identifier of the cell, e.g. `STONE` or `AIR`.
    fn material_of(&self, pos: BlockPos) -> &str;

    /// Whether an entity can occupy the cell without obstruction.
    fn is_passable(&self, pos: BlockPos) -> bool {
        is_air_material(self.material_of(pos))
    }

    fn is_liquid(&self, pos: BlockPos) -> bool {
        is_liquid_material(self.material_of(pos))
    }
}

/// A horizontal band of one material spanning `from_y..=to_y` everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub from_y: i32,
    pub to_y: i32,
    pub material: String,
}

/// In-memory terrain made of layers and individual block overrides.
///
/// Lookup order is: explicit block, then the most recently added layer that
/// covers the height, then [`AIR`].
#[derive(Debug, Clone)]
pub struct MemoryTerrain {
    name: String,
    max_height: i32,
    layers: Vec<Layer>,
    blocks: HashMap<BlockPos, String>,
}

impl MemoryTerrain {
    /// An all-air world.
    pub fn new(name: impl Into<String>, max_height: i32) -> Self {
        Self {
            name: name.into(),
            max_height,
            layers: Vec::new(),
            blocks: HashMap::new(),
        }
    }

    /// Stacks `(material, thickness)` layers upward from `y = 0`, the way a
    /// superflat preset is written. The stack is clipped at `i32::MAX`.
    pub fn superflat<'a>(
        name: impl Into<String>,
        max_height: i32,
        layers: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Self {
        let mut terrain = Self::new(name, max_height);
        let mut next_y: i32 = 0;
        for (material, thickness) in layers {
            if thickness == 0 {
                continue;
            }
            let height = i32::try_from(thickness).unwrap_or(i32::MAX);
            let top = next_y.saturating_add(height - 1);
            terrain = terrain.with_layer(next_y, top, material);
            match top.checked_add(1) {
                Some(y) => next_y = y,
                None => break,
            }
        }
        terrain
    }

    /// Adds a layer covering `from_y..=to_y` (either order).
    pub fn with_layer(mut self, from_y: i32, to_y: i32, material: impl Into<String>) -> Self {
        let (from_y, to_y) = if from_y <= to_y { (from_y, to_y) } else { (to_y, from_y) };
        self.layers.push(Layer {
            from_y,
            to_y,
            material: material.into(),
        });
        self
    }

    pub fn set_block(&mut self, pos: BlockPos, material: impl Into<String>) {
        self.blocks.insert(pos, material.into());
    }

    /// Overwrites a whole column from `from_y` to `to_y` inclusive.
    pub fn fill_column(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, material: &str) {
        for y in from_y.min(to_y)..=from_y.max(to_y) {
            self.set_block(BlockPos::new(x, y, z), material);
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl Terrain for MemoryTerrain {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_height(&self) -> i32 {
        self.max_height
    }

    fn material_of(&self, pos: BlockPos) -> &str {
        if let Some(material) = self.blocks.get(&pos) {
            return material;
        }
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.from_y <= pos.y && pos.y <= layer.to_y)
            .map(|layer| layer.material.as_str())
            .unwrap_or(AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_classification() {
        assert!(is_air_material("air"));
        assert!(is_air_material("CAVE_AIR"));
        assert!(!is_air_material("STONE"));
        assert!(is_liquid_material("lava"));
        assert!(is_liquid_material("WATER"));
        assert!(!is_liquid_material("ICE"));
    }

    #[test]
    fn test_superflat_layers_stack_from_zero() {
        let terrain = MemoryTerrain::superflat(
            "flat",
            256,
            [("BEDROCK", 1), ("DIRT", 2), ("GRASS_BLOCK", 1)],
        );
        assert_eq!(terrain.material_of(BlockPos::new(0, 0, 0)), "BEDROCK");
        assert_eq!(terrain.material_of(BlockPos::new(5, 2, -5)), "DIRT");
        assert_eq!(terrain.material_of(BlockPos::new(5, 3, -5)), "GRASS_BLOCK");
        assert_eq!(terrain.material_of(BlockPos::new(5, 4, -5)), AIR);
        assert!(terrain.is_passable(BlockPos::new(5, 4, -5)));
        assert!(!terrain.is_passable(BlockPos::new(5, 3, -5)));
    }

    #[test]
    fn test_superflat_clips_oversized_layers() {
        let terrain = MemoryTerrain::superflat(
            "deep",
            256,
            [("STONE", u32::MAX), ("DIRT", u32::MAX), ("GRASS_BLOCK", 1)],
        );
        // The grass layer no longer fits and is dropped.
        assert_eq!(terrain.layers().len(), 2);
        assert_eq!(terrain.layers()[0].to_y, i32::MAX - 1);
        assert_eq!(terrain.material_of(BlockPos::new(0, i32::MAX - 1, 0)), "STONE");
        assert_eq!(terrain.material_of(BlockPos::new(0, i32::MAX, 0)), "DIRT");
    }

    #[test]
    fn test_block_overrides_win_over_layers() {
        let mut terrain = MemoryTerrain::new("world", 128).with_layer(63, 63, "STONE");
        terrain.set_block(BlockPos::new(1, 63, 1), "LAVA");
        assert_eq!(terrain.material_of(BlockPos::new(1, 63, 1)), "LAVA");
        assert!(terrain.is_liquid(BlockPos::new(1, 63, 1)));
        assert_eq!(terrain.material_of(BlockPos::new(2, 63, 1)), "STONE");
    }
}
