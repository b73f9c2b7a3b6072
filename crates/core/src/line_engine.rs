// crates/core/src/line_engine.rs
//! Deterministic stand-in engine that walks a straight block line.
//!
//! It knows nothing about terrain. It exists so the job pipeline can be
//! exercised end to end without the native pathfinder: each call emits at
//! most `max_points` points along the line from `start` to `end`, and the
//! last call is marked finished.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::engine::{ContextHandle, PathEngine};
use crate::error::EngineError;
use crate::types::{BlockPos, RawSegment, Seed};

/// Straight-line engine with observable context accounting.
pub struct LineEngine {
    max_points: usize,
    call_delay: Duration,
    next_context: AtomicU64,
    created: AtomicUsize,
    freed: AtomicUsize,
}

impl LineEngine {
    /// Create an engine that emits at most `max_points` (minimum 2) points
    /// per call.
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points: max_points.max(2),
            call_delay: Duration::ZERO,
            next_context: AtomicU64::new(1),
            created: AtomicUsize::new(0),
            freed: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every `find_segment` call, to mimic a slow
    /// native search.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Number of contexts allocated so far.
    pub fn contexts_created(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// Number of contexts released so far.
    pub fn contexts_freed(&self) -> usize {
        self.freed.load(Ordering::Acquire)
    }

    /// Contexts allocated but not yet released.
    pub fn live_contexts(&self) -> usize {
        self.contexts_created()
            .saturating_sub(self.contexts_freed())
    }
}

impl Default for LineEngine {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Every block on the rounded line from `start` to `end`, inclusive.
fn walk(start: BlockPos, end: BlockPos, limit: usize) -> Vec<BlockPos> {
    let delta = |from: i32, to: i32| to as i64 - from as i64;
    let (dx, dy, dz) = (delta(start.x, end.x), delta(start.y, end.y), delta(start.z, end.z));
    let steps = dx.unsigned_abs().max(dy.unsigned_abs()).max(dz.unsigned_abs());
    if steps == 0 {
        return vec![start];
    }
    // Every intermediate value lies between `from` and `from + delta`, so it
    // fits back into an i32.
    let lerp = |from: i32, delta: i64, i: u64| {
        (from as i64 + (delta as f64 * i as f64 / steps as f64).round() as i64) as i32
    };
    (0..=steps)
        .take(limit)
        .map(|i| {
            BlockPos::new(
                lerp(start.x, dx, i),
                lerp(start.y, dy, i),
                lerp(start.z, dz, i),
            )
        })
        .collect()
}

fn collinear(a: BlockPos, b: BlockPos, c: BlockPos) -> bool {
    let d = |p: BlockPos, q: BlockPos| {
        (q.x as i64 - p.x as i64, q.y as i64 - p.y as i64, q.z as i64 - p.z as i64)
    };
    let (ux, uy, uz) = d(a, b);
    let (vx, vy, vz) = d(b, c);
    uy * vz - uz * vy == 0 && uz * vx - ux * vz == 0 && ux * vy - uy * vx == 0
}

impl PathEngine for LineEngine {
    fn new_context(&self, seed: Seed) -> ContextHandle {
        let raw = self.next_context.fetch_add(1, Ordering::Relaxed);
        self.created.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(seed, context = raw, "line engine context allocated");
        ContextHandle::from_raw(raw)
    }

    fn find_segment(
        &self,
        _ctx: &ContextHandle,
        start: BlockPos,
        end: BlockPos,
        _refine: bool,
        budget: i32,
    ) -> Result<RawSegment, EngineError> {
        if budget <= 0 {
            return Err(EngineError::Other(format!("iteration budget {budget} exhausted")));
        }
        if !self.call_delay.is_zero() {
            std::thread::sleep(self.call_delay);
        }
        let points = walk(start, end, self.max_points);
        let finished = points.last() == Some(&end);
        Ok(RawSegment::new(points, finished))
    }

    fn refine(&self, _ctx: &ContextHandle, points: &[BlockPos]) -> Vec<BlockPos> {
        if points.len() < 3 {
            return points.to_vec();
        }
        let mut out = vec![points[0]];
        for window in points.windows(3) {
            if !collinear(window[0], window[1], window[2]) {
                out.push(window[1]);
            }
        }
        out.push(points[points.len() - 1]);
        out
    }

    fn free_context(&self, ctx: ContextHandle) {
        self.freed.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(context = ctx.raw(), "line engine context freed");
    }

    fn name(&self) -> &str {
        "line"
    }
}
