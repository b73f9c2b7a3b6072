// crates/jobs/src/types.rs
//! Types for the pathfinding job system.

use std::fmt;
use std::time::Duration;

use netherpath_core::{BlockPos, Seed};
use thiserror::Error;

/// Unique identifier for a job, per controller.
pub type JobId = u64;

/// Iteration budget handed to every engine call unless overridden.
pub const DEFAULT_ITERATION_BUDGET: i32 = 10_000;

/// Lifecycle of a job's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobOutcome {
    Pending = 0,
    Running = 1,
    Succeeded = 2,
    Cancelled = 3,
    Failed = 4,
}

impl JobOutcome {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Pending,
            1 => Self::Running,
            2 => Self::Succeeded,
            3 => Self::Cancelled,
            _ => Self::Failed,
        }
    }

    /// Whether the worker has finished, one way or another.
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-job knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    /// Run each segment through `PathEngine::refine` before hand-off.
    pub refine: bool,
    /// Iterations the engine may spend per call.
    pub iteration_budget: i32,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            refine: true,
            iteration_budget: DEFAULT_ITERATION_BUDGET,
        }
    }
}

/// Everything needed to start a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRequest {
    pub start: BlockPos,
    pub end: BlockPos,
    pub seed: Seed,
    pub options: JobOptions,
}

impl JobRequest {
    pub fn new(start: BlockPos, end: BlockPos, seed: Seed) -> Self {
        Self {
            start,
            end,
            seed,
            options: JobOptions::default(),
        }
    }

    pub fn with_options(mut self, options: JobOptions) -> Self {
        self.options = options;
        self
    }
}

/// Message the worker schedules for the foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobNotice {
    /// Every segment has been pushed.
    Found { elapsed: Duration, segments: usize },
    /// The engine failed; no further segments follow.
    EngineFailed { message: String },
}

impl fmt::Display for JobNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { elapsed, .. } => {
                write!(f, "Found path in {:.2} seconds", elapsed.as_secs_f64())
            }
            Self::EngineFailed { message } => write!(f, "{message}"),
        }
    }
}

/// Which end of a request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// Synchronous precondition failures from `JobController::start`.
/// No job is created and the active job is left alone.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("Y level {y} of {endpoint} not in valid range")]
    InvalidY { endpoint: Endpoint, y: i32 },

    #[error("The {0} engine isn't supported on this system")]
    Unsupported(String),

    #[error("Failed to spawn pathfinder worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What `JobController::start` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReceipt {
    pub job_id: JobId,
    /// A previous job was still running and has been cancelled.
    pub replaced_running: bool,
}
