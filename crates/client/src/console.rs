// crates/client/src/console.rs
//! Terminal stand-in for a GPU line renderer.
//!
//! Each segment becomes a buffer of `f32` xyz triples relative to a fixed
//! origin, the layout a vertex buffer upload would take. Keeping vertices
//! origin-relative keeps them small enough for `f32` far from spawn.

use netherpath_core::BlockPos;
use netherpath_jobs::RenderFactory;

/// Floats per vertex.
pub const VERTEX_STRIDE: usize = 3;

/// Upload-ready vertices plus the block positions they were built from.
/// `f32` cannot hold every offset exactly, so world positions are read from
/// `points`, never recovered from `vertices`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    serial: usize,
    vertices: Vec<f32>,
    points: Vec<BlockPos>,
}

impl VertexBuffer {
    pub fn serial(&self) -> usize {
        self.serial
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn points(&self) -> &[BlockPos] {
        &self.points
    }
}

#[derive(Debug)]
pub struct ConsoleFactory {
    origin: BlockPos,
    allocated: usize,
    released: usize,
}

impl ConsoleFactory {
    pub fn new(origin: BlockPos) -> Self {
        Self {
            origin,
            allocated: 0,
            released: 0,
        }
    }

    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    /// Origin for buffers built from now on.
    pub fn set_origin(&mut self, origin: BlockPos) {
        self.origin = origin;
    }

    /// Buffers allocated and not yet released.
    pub fn live(&self) -> usize {
        self.allocated - self.released
    }
}

impl RenderFactory for ConsoleFactory {
    type Drawable = VertexBuffer;

    fn materialize(&mut self, points: &[BlockPos]) -> VertexBuffer {
        let mut vertices = Vec::with_capacity(points.len() * VERTEX_STRIDE);
        let offset = |v: i32, o: i32| (v as i64 - o as i64) as f32;
        for p in points {
            vertices.push(offset(p.x, self.origin.x));
            vertices.push(offset(p.y, self.origin.y));
            vertices.push(offset(p.z, self.origin.z));
        }
        self.allocated += 1;
        VertexBuffer {
            serial: self.allocated,
            vertices,
            points: points.to_vec(),
        }
    }

    fn release(&mut self, buffer: VertexBuffer) {
        self.released += 1;
        tracing::trace!(serial = buffer.serial, vertices = buffer.vertex_count(), "Released buffer");
    }
}
