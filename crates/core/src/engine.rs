// crates/core/src/engine.rs
//! PathEngine trait defining the boundary to the native pathfinder.

use std::fmt;

use crate::error::EngineError;
use crate::types::{BlockPos, RawSegment, Seed};

/// Opaque per-job engine state (seed-derived terrain knowledge).
///
/// Deliberately neither `Clone` nor `Copy`: [`PathEngine::free_context`]
/// consumes it, so a handle can only be released once.
#[derive(PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

impl ContextHandle {
    /// Wrap an engine-specific raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextHandle({:#x})", self.0)
    }
}

/// Trait for pathfinding engines driven by the job pipeline.
///
/// Every call may block for as long as the engine needs; none of them are
/// interruptible. Implementations must tolerate `find_segment` and `refine`
/// being called from a worker thread other than the one that created the
/// context.
pub trait PathEngine: Send + Sync + 'static {
    /// Allocate a context for `seed`. Must be paired with exactly one
    /// [`PathEngine::free_context`].
    fn new_context(&self, seed: Seed) -> ContextHandle;

    /// Search from `start` towards `end`, spending at most `budget`
    /// iterations. Returns the next run of points; `finished` is set once
    /// the goal is reached.
    fn find_segment(
        &self,
        ctx: &ContextHandle,
        start: BlockPos,
        end: BlockPos,
        refine: bool,
        budget: i32,
    ) -> Result<RawSegment, EngineError>;

    /// Simplify a finished run of points.
    fn refine(&self, ctx: &ContextHandle, points: &[BlockPos]) -> Vec<BlockPos>;

    /// Release a context.
    fn free_context(&self, ctx: ContextHandle);

    /// Whether the engine can run on this system at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Engine name for logging.
    fn name(&self) -> &str;
}
