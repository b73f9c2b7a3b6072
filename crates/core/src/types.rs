// crates/core/src/types.rs
//! Shared value types for the pathfinding pipeline.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// World seed the engine derives terrain knowledge from.
pub type Seed = i64;

/// Seed used when nothing better is known (2b2t's nether seed).
pub const DEFAULT_SEED: Seed = 146_008_555_100_680;

/// Y levels the engine can path through. Anything outside is rejected before
/// a job is created.
pub const VALID_Y: RangeInclusive<i32> = 1..=127;

/// Integer block coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// What one engine call hands back, before refinement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub points: Vec<BlockPos>,
    /// `true` once the engine has reached the goal.
    pub finished: bool,
}

impl RawSegment {
    pub fn new(points: Vec<BlockPos>, finished: bool) -> Self {
        Self { points, finished }
    }
}

/// One ordered run of points produced by a single engine call (possibly
/// refined). Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    points: Vec<BlockPos>,
    is_final: bool,
}

impl Segment {
    pub fn new(points: Vec<BlockPos>, is_final: bool) -> Self {
        Self { points, is_final }
    }

    pub fn points(&self) -> &[BlockPos] {
        &self.points
    }

    /// `true` only on the last segment of a job.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
