// crates/jobs/src/render.rs
//! Per-segment drawables owned by the foreground.

use netherpath_core::{BlockPos, Segment};

/// Presentation boundary: turns a point run into something drawable and
/// releases it again. Both calls happen on the foreground thread only.
pub trait RenderFactory {
    type Drawable;

    fn materialize(&mut self, points: &[BlockPos]) -> Self::Drawable;

    fn release(&mut self, drawable: Self::Drawable);
}

/// Ordered drawables for the segments drained so far.
///
/// Append-only while a job runs; [`RenderResourceSet::clear`] releases
/// everything. Dropping the set releases whatever it still holds.
pub struct RenderResourceSet<F: RenderFactory> {
    factory: F,
    drawables: Vec<F::Drawable>,
    points: usize,
}

impl<F: RenderFactory> RenderResourceSet<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            drawables: Vec::new(),
            points: 0,
        }
    }

    /// Materialize `segment` and append it after everything already held.
    pub fn append(&mut self, segment: Segment) -> &F::Drawable {
        self.points += segment.len();
        let drawable = self.factory.materialize(segment.points());
        self.drawables.push(drawable);
        &self.drawables[self.drawables.len() - 1]
    }

    /// Release every drawable, oldest first, then empty the set. Returns
    /// how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.drawables.len();
        for drawable in self.drawables.drain(..) {
            self.factory.release(drawable);
        }
        self.points = 0;
        released
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Total points across all held segments.
    pub fn point_count(&self) -> usize {
        self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F::Drawable> {
        self.drawables.iter()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

impl<F: RenderFactory> Drop for RenderResourceSet<F> {
    fn drop(&mut self) {
        self.clear();
    }
}
