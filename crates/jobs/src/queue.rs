// crates/jobs/src/queue.rs
//! Per-job hand-off of finished segments from the worker to the tick.

use netherpath_core::Segment;
use tokio::sync::mpsc;

/// Create the two halves of a job's segment queue.
pub fn segment_queue() -> (SegmentSender, SegmentQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SegmentSender { tx }, SegmentQueue { rx })
}

/// Producer half, owned by the worker.
pub struct SegmentSender {
    tx: mpsc::UnboundedSender<Segment>,
}

impl SegmentSender {
    /// Queue a segment. Never blocks. Returns `false` when the consumer is
    /// gone (the job was discarded), in which case the segment is dropped.
    pub fn push(&self, segment: Segment) -> bool {
        self.tx.send(segment).is_ok()
    }

    /// Whether the consumer half has been dropped.
    pub fn is_discarded(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, held by the job handle on the foreground.
pub struct SegmentQueue {
    rx: mpsc::UnboundedReceiver<Segment>,
}

impl SegmentQueue {
    /// Next segment in push order, if one is buffered. Never blocks.
    pub fn try_pop(&mut self) -> Option<Segment> {
        self.rx.try_recv().ok()
    }

    /// Segments buffered right now.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
