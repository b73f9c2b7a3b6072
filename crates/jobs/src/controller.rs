// crates/jobs/src/controller.rs
//! Owner of the single active job.

use std::sync::Arc;

use netherpath_core::{PathEngine, VALID_Y};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::handle::JobHandle;
use super::queue::segment_queue;
use super::render::{RenderFactory, RenderResourceSet};
use super::state::JobState;
use super::types::{Endpoint, JobId, JobRequest, StartError, StartReceipt};
use super::worker::{ContextGuard, JobWorker};

/// Single-flight job manager.
///
/// Lives on the foreground thread. Every method that touches the active
/// slot or the render set takes `&mut self`, so the worker can never change
/// what counts as "active". Starting a job while another is active cancels
/// the old one without waiting for its thread.
pub struct JobController<E: PathEngine, F: RenderFactory> {
    engine: Arc<E>,
    pub(crate) renders: RenderResourceSet<F>,
    pub(crate) active: Option<JobHandle>,
    next_id: JobId,
    #[cfg(test)]
    refuse_spawn: bool,
}

impl<E: PathEngine, F: RenderFactory> JobController<E, F> {
    pub fn new(engine: Arc<E>, factory: F) -> Self {
        Self {
            engine,
            renders: RenderResourceSet::new(factory),
            active: None,
            next_id: 1,
            #[cfg(test)]
            refuse_spawn: false,
        }
    }

    /// Start a new job, replacing any active one.
    ///
    /// Returns immediately. Only precondition failures are reported here;
    /// engine failures arrive later through [`JobController::tick`].
    pub fn start(&mut self, request: JobRequest) -> Result<StartReceipt, StartError> {
        for (endpoint, y) in [(Endpoint::Start, request.start.y), (Endpoint::End, request.end.y)] {
            if !VALID_Y.contains(&y) {
                return Err(StartError::InvalidY { endpoint, y });
            }
        }
        if !self.engine.is_supported() {
            return Err(StartError::Unsupported(self.engine.name().to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        let (segments, queue) = segment_queue();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let state = Arc::new(JobState::new(id));
        let guard = ContextGuard::acquire(Arc::clone(&self.engine), request.seed);
        let worker = JobWorker::new(
            request,
            guard,
            segments,
            notice_tx,
            cancel.clone(),
            Arc::clone(&state),
        );
        // A refused spawn drops the worker, and with it the new context. The
        // old job is only discarded once its replacement is running.
        self.spawn_worker(id, worker).map_err(StartError::Spawn)?;

        let replaced_running = self.discard_active();
        self.renders.clear();
        self.active = Some(JobHandle::new(request, queue, notice_rx, cancel, state));
        tracing::info!(
            job_id = id,
            seed = request.seed,
            start = %request.start,
            end = %request.end,
            refine = request.options.refine,
            engine = self.engine.name(),
            "Pathfinder job started"
        );
        Ok(StartReceipt {
            job_id: id,
            replaced_running,
        })
    }

    /// Cancel and forget the active job. Its worker keeps running in the
    /// background until its current engine call returns. Returns whether a
    /// job was active.
    pub fn cancel(&mut self) -> bool {
        let had_job = self.active.is_some();
        self.discard_active();
        had_job
    }

    /// [`JobController::cancel`] plus dropping everything rendered so far.
    pub fn reset(&mut self) {
        self.cancel();
        let released = self.renders.clear();
        tracing::debug!(released, "Render set reset");
    }

    /// Id of the active job, if any.
    pub fn active_job(&self) -> Option<JobId> {
        self.active.as_ref().map(JobHandle::id)
    }

    pub fn active(&self) -> Option<&JobHandle> {
        self.active.as_ref()
    }

    pub fn renders(&self) -> &RenderResourceSet<F> {
        &self.renders
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Mutable access to the render factory, e.g. to move its origin.
    pub fn factory_mut(&mut self) -> &mut F {
        self.renders.factory_mut()
    }

    fn spawn_worker(&self, id: JobId, worker: JobWorker<E>) -> std::io::Result<()> {
        #[cfg(test)]
        if self.refuse_spawn {
            return Err(std::io::Error::other("worker spawning refused"));
        }
        std::thread::Builder::new()
            .name(format!("pathfinder-job-{id}"))
            .spawn(move || worker.run())
            .map(drop)
    }

    /// Drop the active handle after setting its token. Returns whether the
    /// job had not resolved yet.
    fn discard_active(&mut self) -> bool {
        let Some(job) = self.active.take() else {
            return false;
        };
        let running = !job.outcome().is_resolved();
        job.cancel();
        tracing::info!(
            job_id = job.id(),
            running,
            end = %job.request().end,
            "Pathfinder job cancelled"
        );
        running
    }
}
