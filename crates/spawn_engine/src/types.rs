//! # Core Type Definitions
//!
//! The small value types shared by every part of the spawn engine.
//!
//! ## Key Types
//!
//! - [`BlockPos`] - Integer coordinates of a single terrain cell
//! - [`Region`] - The six-integer sampling volume configured for a world
//! - [`Location`] - A finished spawn point with real coordinates and rotation
//!
//! Axis bounds in a [`Region`] are stored exactly as configured. Nothing in the
//! engine assumes `min <= max`; every consumer normalizes the pair itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer coordinates of one terrain cell.
///
/// `y` is the vertical axis, matching the usual voxel-world convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell `n` blocks above this one, or `None` past `i32::MAX`.
    pub const fn up(self, n: i32) -> Option<Self> {
        match self.y.checked_add(n) {
            Some(y) => Some(Self::new(self.x, y, self.z)),
            None => None,
        }
    }

    /// The cell directly below this one, or `None` at `i32::MIN`.
    pub const fn below(self) -> Option<Self> {
        match self.y.checked_sub(1) {
            Some(y) => Some(Self::new(self.x, y, self.z)),
            None => None,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Sampling volume for a world.
///
/// Each axis is an inclusive integer range. The pairs are order-independent:
/// `x_min = 10, x_max = -10` describes the same volume as `-10..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub z_min: i32,
    pub z_max: i32,
}

impl Region {
    pub const fn new(
        x_min: i32,
        x_max: i32,
        y_min: i32,
        y_max: i32,
        z_min: i32,
        z_max: i32,
    ) -> Self {
        Self { x_min, x_max, y_min, y_max, z_min, z_max }
    }

    /// Normalized `(low, high)` bounds of the x axis.
    pub fn x_bounds(&self) -> (i32, i32) {
        ordered(self.x_min, self.x_max)
    }

    /// Normalized `(low, high)` bounds of the y axis.
    pub fn y_bounds(&self) -> (i32, i32) {
        ordered(self.y_min, self.y_max)
    }

    /// Normalized `(low, high)` bounds of the z axis.
    pub fn z_bounds(&self) -> (i32, i32) {
        ordered(self.z_min, self.z_max)
    }

    /// Returns `true` if the cell lies inside the normalized volume.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let within = |(low, high): (i32, i32), v: i32| low <= v && v <= high;
        within(self.x_bounds(), pos.x)
            && within(self.y_bounds(), pos.y)
            && within(self.z_bounds(), pos.z)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new(-1000, 1000, 64, 128, -1000, 1000)
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A spawn point inside a named world.
///
/// Locations produced by the selector are block-centered on x/z (`.5`
/// fractions), sit at an integer y, carry a random yaw in `[0, 360)` and a
/// pitch of zero. They are plain values; cloning one never aliases another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Builds the standing location for a cell: centered on x/z, integer y,
    /// the given yaw and a level pitch.
    pub fn centered(world: impl Into<String>, pos: BlockPos, yaw: f32) -> Self {
        Self {
            world: world.into(),
            x: f64::from(pos.x) + 0.5,
            y: f64::from(pos.y),
            z: f64::from(pos.z) + 0.5,
            yaw,
            pitch: 0.0,
        }
    }

    /// The cell containing this location.
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ({:.1}, {:.1}, {:.1}) yaw {:.1}",
            self.world, self.x, self.y, self.z, self.yaw
        )
    }
}
