// crates/jobs/src/tick.rs
//! Foreground consumer, run once per fixed cycle.

use netherpath_core::PathEngine;

use super::controller::JobController;
use super::render::RenderFactory;
use super::types::{JobId, JobNotice, JobOutcome};

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Job that was active at the start of the tick.
    pub job_id: Option<JobId>,
    /// Segments materialized this tick.
    pub drained: usize,
    /// Set when the job resolved and was released this tick.
    pub finished: Option<JobOutcome>,
    /// Messages the worker scheduled for the foreground.
    pub notices: Vec<JobNotice>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.job_id.is_none()
    }
}

impl<E: PathEngine, F: RenderFactory> JobController<E, F> {
    /// Drain whatever the active job has buffered into the render set and
    /// observe its completion. Never blocks.
    ///
    /// Per tick, at most the segments buffered when the tick began are
    /// drained. A resolved job is released: on success its remaining
    /// segments are drained first and the render set is kept as the final
    /// path; on failure or cancellation the render set is cleared.
    pub fn tick(&mut self) -> TickReport {
        let Some(job) = self.active.as_mut() else {
            return TickReport::default();
        };
        let mut report = TickReport {
            job_id: Some(job.id()),
            ..TickReport::default()
        };

        let outcome = job.outcome();
        if outcome.is_resolved() {
            if outcome == JobOutcome::Succeeded {
                while let Some(segment) = job.try_pop() {
                    self.renders.append(segment);
                    report.drained += 1;
                }
            }
            report.notices = job.drain_notices();
            report.finished = Some(outcome);
            self.active = None;

            if outcome == JobOutcome::Succeeded {
                tracing::debug!(
                    job_id = report.job_id,
                    segments = self.renders.len(),
                    points = self.renders.point_count(),
                    "Job finished, keeping final render"
                );
            } else {
                let released = self.renders.clear();
                tracing::debug!(
                    job_id = report.job_id,
                    %outcome,
                    released,
                    "Job ended without a path, render set cleared"
                );
            }
            return report;
        }

        for _ in 0..job.buffered() {
            let Some(segment) = job.try_pop() else { break };
            self.renders.append(segment);
            report.drained += 1;
        }
        report.notices = job.drain_notices();
        report
    }
}
