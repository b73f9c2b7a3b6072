// crates/client/src/repl.rs
//! Interactive session: one long-lived controller driven by typed commands.
//!
//! Lines are parsed with clap in multicall mode, so each line reads like its
//! own small command line (`pathfind --seed 2b2t.org 100 64 ~`). A leading
//! `;` is accepted and ignored. Starting a job while one runs replaces it.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use netherpath_core::seeds::SeedLookup;
use netherpath_core::{heading_target, parse_endpoints, BlockPos, PathEngine, SeedTable};
use netherpath_jobs::{JobController, JobId, JobOptions, JobRequest};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::console::ConsoleFactory;
use crate::session;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Debug, Subcommand)]
enum ReplCommand {
    /// Pathfind to `X Y Z`, or from `X Y Z` to `X Y Z`.
    Pathfind {
        #[command(flatten)]
        flags: PathfindFlags,
        #[arg(required = true, num_args = 3..=6, allow_hyphen_values = true, value_name = "COORDS")]
        coords: Vec<String>,
    },
    /// Pathfind DISTANCE blocks in the current direction.
    Thisway {
        #[command(flatten)]
        flags: PathfindFlags,
        #[arg(allow_hyphen_values = true)]
        distance: i32,
    },
    /// Stop the current pathfinding job (it finishes its current engine call in the background).
    Cancel,
    /// Stop the current job and stop rendering the path.
    Reset,
    /// Store the seed for a server.
    Addseed {
        #[arg(allow_hyphen_values = true)]
        seed: i64,
        /// Server to store it for; defaults to the current server.
        #[arg(long)]
        ip: Option<String>,
    },
    /// List known seeds.
    Seeds,
    /// Move the player. Relative coordinates and new render buffers use it.
    Player {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        #[arg(allow_hyphen_values = true)]
        z: i32,
        /// Heading in degrees; unchanged when omitted.
        #[arg(allow_hyphen_values = true)]
        yaw: Option<f32>,
    },
    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, clap::Args)]
struct PathfindFlags {
    /// Seed, or the name of a server in the seed table.
    #[arg(long)]
    seed: Option<String>,
    /// Do not simplify the result of the pathfinder.
    #[arg(long)]
    noraytrace: bool,
}

/// Session-wide settings.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub server: String,
    pub seeds_path: PathBuf,
    pub player: BlockPos,
    pub yaw: f32,
    /// Used when a command gives no `--seed`.
    pub seed: Option<String>,
    pub refine: bool,
    pub budget: i32,
}

/// Result of one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Reply(Vec<String>),
    Quit,
}

pub struct Repl<E: PathEngine> {
    ctrl: JobController<E, ConsoleFactory>,
    seeds: SeedTable,
    config: ReplConfig,
}

impl<E: PathEngine> Repl<E> {
    pub fn new(engine: Arc<E>, seeds: SeedTable, config: ReplConfig) -> Self {
        Self {
            ctrl: JobController::new(engine, ConsoleFactory::new(config.player)),
            seeds,
            config,
        }
    }

    pub fn controller(&self) -> &JobController<E, ConsoleFactory> {
        &self.ctrl
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.ctrl.active_job()
    }

    /// Handle one input line. Errors are replied, never returned.
    pub fn execute(&mut self, line: &str) -> Step {
        let line = line.trim().trim_start_matches(';');
        let words: Vec<&str> = line.split_whitespace().collect();
        let words = if words.is_empty() { vec!["help"] } else { words };

        let parsed = match ReplLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => return Step::Reply(vec![e.render().to_string().trim_end().to_string()]),
        };
        if let ReplCommand::Quit = parsed.command {
            return Step::Quit;
        }
        match self.dispatch(parsed.command) {
            Ok(lines) => Step::Reply(lines),
            Err(e) => {
                tracing::debug!(error = %e, line, "Command failed");
                Step::Reply(vec![format!("{e:#}")])
            }
        }
    }

    /// One foreground tick; returns what to print.
    pub fn tick(&mut self) -> Vec<String> {
        let report = self.ctrl.tick();
        session::describe_tick(&self.ctrl, &report)
    }

    fn dispatch(&mut self, command: ReplCommand) -> anyhow::Result<Vec<String>> {
        match command {
            ReplCommand::Pathfind { flags, coords } => {
                let (start, end) = parse_endpoints(coords.as_slice(), self.config.player)?;
                self.start_job(start, end, flags)
            }
            ReplCommand::Thisway { flags, distance } => {
                let player = self.config.player;
                let end = heading_target(player, self.config.yaw, distance);
                self.start_job(player, end, flags)
            }
            ReplCommand::Cancel => Ok(vec![if self.ctrl.cancel() {
                "Canceled pathfinder".to_string()
            } else {
                "No pathfinder running".to_string()
            }]),
            ReplCommand::Reset => {
                self.ctrl.reset();
                Ok(vec!["Stopped rendering the path".to_string()])
            }
            ReplCommand::Addseed { seed, ip } => {
                let ip = ip.unwrap_or_else(|| self.config.server.clone());
                self.seeds.insert(ip.clone(), seed);
                self.seeds.save(&self.config.seeds_path)?;
                tracing::info!(server = %ip, seed, "Seed stored");
                Ok(vec![format!("Set seed for {ip}")])
            }
            ReplCommand::Seeds => Ok(self
                .seeds
                .iter()
                .map(|(server, seed)| format!("{server}: {seed}"))
                .collect()),
            ReplCommand::Player { x, y, z, yaw } => {
                let player = BlockPos::new(x, y, z);
                self.config.player = player;
                if let Some(yaw) = yaw {
                    self.config.yaw = yaw;
                }
                self.ctrl.factory_mut().set_origin(player);
                Ok(vec![format!("Player at {player}, yaw {}", self.config.yaw)])
            }
            ReplCommand::Quit => Ok(Vec::new()),
        }
    }

    fn start_job(
        &mut self,
        start: BlockPos,
        end: BlockPos,
        flags: PathfindFlags,
    ) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        let explicit = flags.seed.as_deref().or(self.config.seed.as_deref());
        let lookup = session::resolve_seed(&self.seeds, explicit, &self.config.server)?;
        if let SeedLookup::Defaulted(_) = lookup {
            lines.push(format!(
                "No seed for server \"{}\", defaulting to 2b2t",
                self.config.server
            ));
        }

        let options = JobOptions {
            refine: self.config.refine && !flags.noraytrace,
            iteration_budget: self.config.budget,
        };
        let request = JobRequest::new(start, end, lookup.seed()).with_options(options);
        let receipt = self.ctrl.start(request)?;
        if receipt.replaced_running {
            lines.push("Canceled existing path finder".to_string());
        }
        lines.push(format!("Pathfinding from {start} to {end}"));
        Ok(lines)
    }
}

/// Read stdin line by line on a plain thread. A blocked read on a runtime
/// blocking task would hold up runtime shutdown until the next newline.
pub fn stdin_lines() -> anyhow::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(rx)
}

/// Feed `lines` to `repl` and tick it every `period` until `quit`, end of
/// input, or `shutdown`. Everything to show goes through `out`.
pub async fn run<E, S>(
    repl: &mut Repl<E>,
    mut lines: mpsc::UnboundedReceiver<String>,
    period: Duration,
    shutdown: S,
    mut out: impl FnMut(&str),
) where
    E: PathEngine,
    S: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            line = lines.recv() => {
                let Some(line) = line else { break };
                match repl.execute(&line) {
                    Step::Reply(reply) => reply.iter().for_each(|l| out(l.as_str())),
                    Step::Quit => break,
                }
            }
            _ = interval.tick() => {
                for line in repl.tick() {
                    out(line.as_str());
                }
            }
        }
    }
    repl.ctrl.reset();
}
