// crates/jobs/src/state.rs
//! Atomic outcome tracking for a single job.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use super::types::{JobId, JobOutcome};

/// Shared between the worker (writer) and the foreground (reader).
///
/// The outcome is published with `Release` after the last segment push, so a
/// reader that observes a resolved outcome with `Acquire` also sees every
/// segment the worker queued.
pub struct JobState {
    id: JobId,
    outcome: AtomicU8,
    segments_pushed: AtomicUsize,
}

impl JobState {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            outcome: AtomicU8::new(JobOutcome::Pending as u8),
            segments_pushed: AtomicUsize::new(0),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// Transition Pending -> Running. No-op once resolved.
    pub fn set_running(&self) {
        let _ = self.outcome.compare_exchange(
            JobOutcome::Pending as u8,
            JobOutcome::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Record the terminal outcome. The first resolution wins; returns
    /// whether this call was it.
    pub fn resolve(&self, outcome: JobOutcome) -> bool {
        debug_assert!(outcome.is_resolved(), "resolve() needs a terminal outcome");
        let mut current = self.outcome.load(Ordering::Acquire);
        loop {
            if JobOutcome::from_u8(current).is_resolved() {
                return false;
            }
            match self.outcome.compare_exchange_weak(
                current,
                outcome as u8,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn outcome(&self) -> JobOutcome {
        JobOutcome::from_u8(self.outcome.load(Ordering::Acquire))
    }

    /// Count a pushed segment and return the new total.
    pub fn record_segment(&self) -> usize {
        self.segments_pushed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn segments_pushed(&self) -> usize {
        self.segments_pushed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_lifecycle() {
        let state = JobState::new(7);
        assert_eq!(state.id(), 7);
        assert_eq!(state.outcome(), JobOutcome::Pending);

        state.set_running();
        assert_eq!(state.outcome(), JobOutcome::Running);

        assert_eq!(state.record_segment(), 1);
        assert_eq!(state.record_segment(), 2);
        assert_eq!(state.segments_pushed(), 2);

        assert!(state.resolve(JobOutcome::Succeeded));
        assert_eq!(state.outcome(), JobOutcome::Succeeded);
    }

    #[test]
    fn test_first_resolution_wins() {
        let state = JobState::new(1);
        state.set_running();
        assert!(state.resolve(JobOutcome::Cancelled));
        assert!(!state.resolve(JobOutcome::Failed));
        assert!(!state.resolve(JobOutcome::Succeeded));
        assert_eq!(state.outcome(), JobOutcome::Cancelled);
    }

    #[test]
    fn test_set_running_after_resolve_is_ignored() {
        let state = JobState::new(1);
        assert!(state.resolve(JobOutcome::Failed));
        state.set_running();
        assert_eq!(state.outcome(), JobOutcome::Failed);
    }
}
