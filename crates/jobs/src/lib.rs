// crates/jobs/src/lib.rs
//! Single-flight background pathfinding jobs.
//!
//! Provides:
//! - `JobController`: owns the one active job and the render set
//! - `JobWorker`: drives the engine on a background thread
//! - `SegmentQueue`: non-blocking hand-off of finished segments
//! - `RenderResourceSet`: per-segment drawables, foreground only
//! - `TickReport`: what one foreground tick drained and observed

pub mod controller;
pub mod handle;
pub mod queue;
pub mod render;
pub mod state;
pub mod tick;
pub mod types;
pub mod worker;

pub use controller::JobController;
pub use handle::JobHandle;
pub use queue::{segment_queue, SegmentQueue, SegmentSender};
pub use render::{RenderFactory, RenderResourceSet};
pub use state::JobState;
pub use tick::TickReport;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    Endpoint, JobId, JobNotice, JobOptions, JobOutcome, JobRequest, StartError, StartReceipt,
};
pub use worker::JobWorker;
