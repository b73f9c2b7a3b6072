// crates/jobs/src/worker.rs
//! Background driver for one job.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use netherpath_core::{ContextHandle, EngineError, PathEngine, Seed, Segment};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::queue::SegmentSender;
use super::state::JobState;
use super::types::{JobNotice, JobOutcome, JobRequest};

/// Owns an engine context and frees it when dropped.
pub(crate) struct ContextGuard<E: PathEngine> {
    engine: Arc<E>,
    ctx: Option<ContextHandle>,
}

impl<E: PathEngine> ContextGuard<E> {
    pub(crate) fn acquire(engine: Arc<E>, seed: Seed) -> Self {
        let ctx = engine.new_context(seed);
        Self {
            engine,
            ctx: Some(ctx),
        }
    }

    fn engine(&self) -> &E {
        &self.engine
    }

    fn ctx(&self) -> &ContextHandle {
        match &self.ctx {
            Some(ctx) => ctx,
            None => unreachable!("context used after release"),
        }
    }
}

impl<E: PathEngine> Drop for ContextGuard<E> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.engine.free_context(ctx);
        }
    }
}

/// How `drive` stopped, when it stopped cleanly.
enum Drive {
    Finished { segments: usize },
    Cancelled,
}

/// Drives the engine across as many calls as the path needs, pushing each
/// (optionally refined) segment to the job's queue.
///
/// Cancellation is checked between engine calls only; a call already in
/// flight runs to completion and its result is thrown away.
pub struct JobWorker<E: PathEngine> {
    request: JobRequest,
    guard: ContextGuard<E>,
    segments: SegmentSender,
    notices: mpsc::UnboundedSender<JobNotice>,
    cancel: CancellationToken,
    state: Arc<JobState>,
}

impl<E: PathEngine> JobWorker<E> {
    pub(crate) fn new(
        request: JobRequest,
        guard: ContextGuard<E>,
        segments: SegmentSender,
        notices: mpsc::UnboundedSender<JobNotice>,
        cancel: CancellationToken,
        state: Arc<JobState>,
    ) -> Self {
        Self {
            request,
            guard,
            segments,
            notices,
            cancel,
            state,
        }
    }

    /// Run to completion on the current thread.
    ///
    /// The context is released before the outcome is published, so anyone
    /// observing a resolved outcome can rely on the context being gone.
    pub fn run(self) {
        let job_id = self.state.id();
        let _span = tracing::info_span!("pathfinder_job", job_id).entered();
        self.state.set_running();
        let started = Instant::now();

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.drive()));
        let outcome = match result {
            Ok(Ok(Drive::Finished { segments })) => {
                let elapsed = started.elapsed();
                tracing::info!(
                    segments,
                    elapsed_secs = elapsed.as_secs_f64(),
                    "Path found"
                );
                self.notify(JobNotice::Found { elapsed, segments });
                JobOutcome::Succeeded
            }
            Ok(Ok(Drive::Cancelled)) => {
                tracing::debug!(
                    segments = self.state.segments_pushed(),
                    "Job cancelled, discarding results"
                );
                JobOutcome::Cancelled
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Engine call failed");
                self.notify(JobNotice::EngineFailed {
                    message: e.to_string(),
                });
                JobOutcome::Failed
            }
            Err(payload) => {
                let e = EngineError::Panicked(panic_message(payload.as_ref()));
                tracing::error!(error = %e, "Engine panicked");
                self.notify(JobNotice::EngineFailed {
                    message: e.to_string(),
                });
                JobOutcome::Failed
            }
        };

        let freed = panic::catch_unwind(AssertUnwindSafe(move || drop(self.guard)));
        if let Err(payload) = freed {
            tracing::error!(
                error = %panic_message(payload.as_ref()),
                "Engine panicked while freeing context"
            );
        }
        self.state.resolve(outcome);
    }

    fn drive(&self) -> Result<Drive, EngineError> {
        let engine = self.guard.engine();
        let ctx = self.guard.ctx();
        let JobRequest { end, options, .. } = self.request;
        let mut start = self.request.start;
        let mut segments = 0;

        loop {
            if self.abandoned() {
                return Ok(Drive::Cancelled);
            }
            let found = engine.find_segment(ctx, start, end, false, options.iteration_budget);
            if self.abandoned() {
                return Ok(Drive::Cancelled);
            }
            let raw = found?;
            let Some(&last) = raw.points.last() else {
                return Err(EngineError::EmptySegment);
            };
            let finished = raw.finished;
            let points = if options.refine {
                engine.refine(ctx, &raw.points)
            } else {
                raw.points
            };

            segments += 1;
            tracing::debug!(segment = segments, points = points.len(), finished, "Segment ready");
            self.segments.push(Segment::new(points, finished));
            self.state.record_segment();

            if finished {
                return Ok(Drive::Finished { segments });
            }
            start = last;
        }
    }

    /// Cancelled, or nobody is left to drain the queue.
    fn abandoned(&self) -> bool {
        self.cancel.is_cancelled() || self.segments.is_discarded()
    }

    /// A cancelled job's notices would never be read; skip them.
    fn notify(&self, notice: JobNotice) {
        if !self.cancel.is_cancelled() {
            let _ = self.notices.send(notice);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
