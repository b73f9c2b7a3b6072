//! Shared fixtures for pipeline tests: a scripted engine with per-seed
//! scripts and gates, and a render factory that counts live drawables.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use netherpath_core::{BlockPos, ContextHandle, EngineError, PathEngine, RawSegment, Seed};
use netherpath_jobs::{JobController, JobNotice, RenderFactory, TickReport};

pub enum Step {
    Points(Vec<BlockPos>, bool),
    Fail,
    Panic,
}

/// Engine whose answers are scripted per seed. A gated seed blocks inside
/// every `find_segment` until the test sends a permit (or drops the gate).
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: Mutex<HashMap<Seed, VecDeque<Step>>>,
    gates: Mutex<HashMap<Seed, Arc<Mutex<mpsc::Receiver<()>>>>>,
    contexts: Mutex<HashMap<u64, Seed>>,
    next_context: AtomicUsize,
    created: AtomicUsize,
    freed: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, seed: Seed, steps: Vec<Step>) {
        self.scripts.lock().unwrap().insert(seed, steps.into());
    }

    /// Gate every call for `seed`. Each `send(())` lets one call through;
    /// dropping the sender opens the gate for good.
    pub fn gate(&self, seed: Seed) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(seed, Arc::new(Mutex::new(rx)));
        tx
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn freed(&self) -> usize {
        self.freed.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PathEngine for ScriptedEngine {
    fn new_context(&self, seed: Seed) -> ContextHandle {
        let raw = self.next_context.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        self.contexts.lock().unwrap().insert(raw, seed);
        self.created.fetch_add(1, Ordering::SeqCst);
        ContextHandle::from_raw(raw)
    }

    fn find_segment(
        &self,
        ctx: &ContextHandle,
        _start: BlockPos,
        _end: BlockPos,
        _refine: bool,
        _budget: i32,
    ) -> Result<RawSegment, EngineError> {
        let seed = self.contexts.lock().unwrap()[&ctx.raw()];
        let gate = self.gates.lock().unwrap().get(&seed).cloned();
        if let Some(gate) = gate {
            let _ = gate.lock().unwrap().recv();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&seed)
            .and_then(VecDeque::pop_front);
        match step {
            Some(Step::Points(points, finished)) => Ok(RawSegment::new(points, finished)),
            Some(Step::Panic) => panic!("scripted engine panic"),
            Some(Step::Fail) | None => Err(EngineError::NoSegment),
        }
    }

    fn refine(&self, _ctx: &ContextHandle, points: &[BlockPos]) -> Vec<BlockPos> {
        points.to_vec()
    }

    fn free_context(&self, ctx: ContextHandle) {
        let removed = self.contexts.lock().unwrap().remove(&ctx.raw());
        assert!(removed.is_some(), "context {ctx:?} freed twice");
        self.freed.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A drawable: the points it was built from, tagged with a serial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub serial: usize,
    pub points: Vec<BlockPos>,
}

#[derive(Debug, Default)]
pub struct CountingFactory {
    pub created: usize,
    pub released: usize,
}

impl CountingFactory {
    pub fn live(&self) -> usize {
        self.created - self.released
    }
}

impl RenderFactory for CountingFactory {
    type Drawable = Polyline;

    fn materialize(&mut self, points: &[BlockPos]) -> Polyline {
        self.created += 1;
        Polyline {
            serial: self.created,
            points: points.to_vec(),
        }
    }

    fn release(&mut self, _drawable: Polyline) {
        self.released += 1;
    }
}

pub type Controller = JobController<ScriptedEngine, CountingFactory>;

pub fn controller(engine: &Arc<ScriptedEngine>) -> Controller {
    JobController::new(Arc::clone(engine), CountingFactory::default())
}

/// Every rendered point, in render order.
pub fn rendered_points(ctrl: &Controller) -> Vec<BlockPos> {
    ctrl.renders()
        .iter()
        .flat_map(|line| line.points.iter().copied())
        .collect()
}

/// Straight run of points along X at y=64.
pub fn run_x(from: i32, to: i32) -> Vec<BlockPos> {
    (from..to).map(|x| BlockPos::new(x, 64, 0)).collect()
}

const DEADLINE: Duration = Duration::from_secs(5);

/// Poll `cond` until it holds or the deadline passes.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}

/// Tick until the active job is released, collecting every report.
pub fn tick_until_finished(ctrl: &mut Controller) -> Vec<TickReport> {
    let mut reports = Vec::new();
    let finished = wait_until(|| {
        let report = ctrl.tick();
        let done = report.finished.is_some() || report.is_idle();
        reports.push(report);
        done
    });
    assert!(finished, "job did not finish in time");
    reports
}

/// Notices across a run of ticks, in delivery order.
pub fn notices(reports: &[TickReport]) -> Vec<JobNotice> {
    reports.iter().flat_map(|r| r.notices.iter().cloned()).collect()
}
