// crates/jobs/src/handle.rs
//! The foreground's record of one job.

use std::sync::Arc;

use netherpath_core::Segment;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::queue::SegmentQueue;
use super::state::JobState;
use super::types::{JobId, JobNotice, JobOutcome, JobRequest};

/// Consumer side of a running job: its queue, its token, and its outcome.
///
/// The engine context is not here; the worker owns it and frees it on every
/// exit path. Dropping a handle is how a job is forgotten: the worker keeps
/// running until it notices the token, and anything it pushes afterwards
/// lands nowhere.
pub struct JobHandle {
    id: JobId,
    request: JobRequest,
    queue: SegmentQueue,
    notices: mpsc::UnboundedReceiver<JobNotice>,
    cancel: CancellationToken,
    state: Arc<JobState>,
}

impl JobHandle {
    pub(crate) fn new(
        request: JobRequest,
        queue: SegmentQueue,
        notices: mpsc::UnboundedReceiver<JobNotice>,
        cancel: CancellationToken,
        state: Arc<JobState>,
    ) -> Self {
        Self {
            id: state.id(),
            request,
            queue,
            notices,
            cancel,
            state,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    pub fn outcome(&self) -> JobOutcome {
        self.state.outcome()
    }

    /// Set the cancellation token. Returns `true` if this call set it.
    pub fn cancel(&self) -> bool {
        let first = !self.cancel.is_cancelled();
        self.cancel.cancel();
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn try_pop(&mut self) -> Option<Segment> {
        self.queue.try_pop()
    }

    pub(crate) fn buffered(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn drain_notices(&mut self) -> Vec<JobNotice> {
        std::iter::from_fn(|| self.notices.try_recv().ok()).collect()
    }
}

// A forgotten job must not keep the engine busy.
impl Drop for JobHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::segment_queue;
    use netherpath_core::BlockPos;

    fn handle() -> (JobHandle, CancellationToken, mpsc::UnboundedSender<JobNotice>) {
        let (_tx, queue) = segment_queue();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let state = Arc::new(JobState::new(3));
        let request = JobRequest::new(BlockPos::new(0, 64, 0), BlockPos::new(1, 64, 0), 42);
        (
            JobHandle::new(request, queue, notice_rx, token.clone(), state),
            token,
            notice_tx,
        )
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (handle, token, _) = handle();
        assert_eq!(handle.id(), 3);
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(token.is_cancelled());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_drop_sets_token() {
        let (handle, token, _) = handle();
        assert!(!token.is_cancelled());
        drop(handle);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_drain_notices_in_order() {
        let (mut handle, _, tx) = handle();
        tx.send(JobNotice::EngineFailed { message: "a".into() }).unwrap();
        tx.send(JobNotice::EngineFailed { message: "b".into() }).unwrap();
        let notices = handle.drain_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].to_string(), "a");
        assert!(handle.drain_notices().is_empty());
    }
}
