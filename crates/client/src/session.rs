// crates/client/src/session.rs
//! One pathfinding run: seed choice, the tick loop, and the result summary.

use std::future::Future;
use std::time::Duration;

use netherpath_core::seeds::SeedLookup;
use netherpath_core::{BlockPos, PathEngine, Seed, SeedError, SeedTable};
use netherpath_jobs::{JobController, JobId, JobOutcome, RenderFactory, TickReport};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::console::{ConsoleFactory, VertexBuffer};

/// Seed for a run: `explicit` (number or server name) when given, else the
/// entry for `server`, else the default.
pub fn resolve_seed(
    table: &SeedTable,
    explicit: Option<&str>,
    server: &str,
) -> Result<SeedLookup, SeedError> {
    match explicit {
        Some(arg) => table.resolve(arg).map(SeedLookup::Known),
        None => Ok(table.seed_for_server(server)),
    }
}

/// How the tick loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Resolved(JobOutcome),
    /// Shutdown fired; the controller was reset.
    Interrupted,
    /// Nothing was running.
    Idle,
}

/// Tick `ctrl` every `period` until its job resolves or `shutdown` fires.
/// `on_tick` sees the controller after each tick.
pub async fn run_until_resolved<E, F, S>(
    ctrl: &mut JobController<E, F>,
    period: Duration,
    shutdown: S,
    mut on_tick: impl FnMut(&JobController<E, F>, &TickReport),
) -> Finish
where
    E: PathEngine,
    F: RenderFactory,
    S: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                ctrl.reset();
                return Finish::Interrupted;
            }
            _ = interval.tick() => {
                let report = ctrl.tick();
                on_tick(ctrl, &report);
                if let Some(outcome) = report.finished {
                    return Finish::Resolved(outcome);
                }
                if report.is_idle() {
                    return Finish::Idle;
                }
            }
        }
    }
}

/// Buffers appended by the last tick, oldest first.
pub fn newest<'a, E: PathEngine>(
    ctrl: &'a JobController<E, ConsoleFactory>,
    report: &TickReport,
) -> impl Iterator<Item = &'a VertexBuffer> {
    let renders = ctrl.renders();
    renders.iter().skip(renders.len().saturating_sub(report.drained))
}

/// Progress lines for one tick: new buffers, worker notices, and the path
/// totals once a job succeeds.
pub fn describe_tick<E: PathEngine>(
    ctrl: &JobController<E, ConsoleFactory>,
    report: &TickReport,
) -> Vec<String> {
    let mut lines: Vec<String> = newest(ctrl, report)
        .map(|buffer| format!("segment {:>3}: {} vertices", buffer.serial(), buffer.vertex_count()))
        .collect();
    lines.extend(report.notices.iter().map(ToString::to_string));
    if report.finished == Some(JobOutcome::Succeeded) {
        lines.push(format!(
            "{} segments, {} points",
            ctrl.renders().len(),
            ctrl.renders().point_count()
        ));
    }
    lines
}

/// Machine-readable result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSummary {
    pub job_id: JobId,
    pub seed: Seed,
    pub outcome: &'static str,
    pub segments: usize,
    pub path: Vec<BlockPos>,
    pub messages: Vec<String>,
}

impl PathSummary {
    pub fn new<E: PathEngine>(
        ctrl: &JobController<E, ConsoleFactory>,
        job_id: JobId,
        seed: Seed,
        outcome: JobOutcome,
        messages: Vec<String>,
    ) -> Self {
        Self {
            job_id,
            seed,
            outcome: outcome.as_str(),
            segments: ctrl.renders().len(),
            path: ctrl
                .renders()
                .iter()
                .flat_map(|buffer| buffer.points().iter().copied())
                .collect(),
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use netherpath_core::{LineEngine, DEFAULT_SEED};
    use netherpath_jobs::{JobOptions, JobRequest};
    use pretty_assertions::assert_eq;

    fn controller(engine: LineEngine, origin: BlockPos) -> JobController<LineEngine, ConsoleFactory> {
        JobController::new(Arc::new(engine), ConsoleFactory::new(origin))
    }

    fn raw_request(end: BlockPos) -> JobRequest {
        JobRequest::new(BlockPos::new(0, 64, 0), end, 42).with_options(JobOptions {
            refine: false,
            ..JobOptions::default()
        })
    }

    #[test]
    fn test_resolve_seed_prefers_explicit() {
        let mut table = SeedTable::new();
        table.insert("example.org", 5);

        assert_eq!(resolve_seed(&table, Some("9"), "x").unwrap(), SeedLookup::Known(9));
        assert_eq!(
            resolve_seed(&table, Some("example.org"), "x").unwrap(),
            SeedLookup::Known(5)
        );
        assert_eq!(
            resolve_seed(&table, None, "example.org").unwrap(),
            SeedLookup::Known(5)
        );
        assert_eq!(
            resolve_seed(&table, None, "localhost").unwrap(),
            SeedLookup::Defaulted(DEFAULT_SEED)
        );
        assert!(matches!(
            resolve_seed(&table, Some("nowhere"), "x"),
            Err(SeedError::UnknownServer(_))
        ));
    }

    #[tokio::test]
    async fn test_run_until_resolved_renders_whole_path() {
        let origin = BlockPos::new(0, 64, 0);
        let mut ctrl = controller(LineEngine::new(16), origin);
        let end = BlockPos::new(40, 64, 0);
        let receipt = ctrl.start(raw_request(end)).unwrap();

        let mut seen = 0;
        let mut lines = Vec::new();
        let finish = run_until_resolved(
            &mut ctrl,
            Duration::from_millis(1),
            std::future::pending(),
            |ctrl, report| {
                seen += newest(ctrl, report).count();
                lines.extend(describe_tick(ctrl, report));
            },
        )
        .await;

        assert_eq!(finish, Finish::Resolved(JobOutcome::Succeeded));
        assert_eq!(seen, ctrl.renders().len());
        assert_eq!(lines.iter().filter(|l| l.starts_with("segment")).count(), seen);
        assert!(lines.iter().any(|l| l.starts_with("Found path in")));
        assert_eq!(
            lines.last(),
            Some(&format!("{seen} segments, {} points", ctrl.renders().point_count()))
        );

        let summary = PathSummary::new(&ctrl, receipt.job_id, 42, JobOutcome::Succeeded, vec![]);
        assert_eq!(summary.outcome, "succeeded");
        assert_eq!(summary.path.first(), Some(&origin));
        assert_eq!(summary.path.last(), Some(&end));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["jobId"], receipt.job_id);
    }

    #[tokio::test]
    async fn test_shutdown_resets_controller() {
        let engine = LineEngine::new(4).with_call_delay(Duration::from_millis(20));
        let mut ctrl = controller(engine, BlockPos::default());
        ctrl.start(raw_request(BlockPos::new(400, 64, 0))).unwrap();

        let finish = run_until_resolved(&mut ctrl, Duration::from_millis(1), async {}, |_, _| {})
            .await;

        assert_eq!(finish, Finish::Interrupted);
        assert!(ctrl.active_job().is_none());
        assert!(ctrl.renders().is_empty());
        assert_eq!(ctrl.renders().factory().live(), 0);
    }

    #[tokio::test]
    async fn test_nothing_running_is_idle() {
        let mut ctrl = controller(LineEngine::default(), BlockPos::default());
        let finish =
            run_until_resolved(&mut ctrl, Duration::from_millis(1), std::future::pending(), |_, _| {})
                .await;
        assert_eq!(finish, Finish::Idle);
    }
}
