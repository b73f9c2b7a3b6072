// crates/client/src/main.rs
//! netherpath client binary.
//!
//! Starts one background pathfinding job, ticks the foreground at a fixed
//! rate to draw segments as they arrive, and exits once the job resolves.
//! Ctrl-C cancels the job and clears what was drawn. `repl` keeps one
//! controller alive across typed commands instead.

mod cli;
mod console;
mod repl;
mod session;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use netherpath_core::seeds::SeedLookup;
use netherpath_core::{heading_target, parse_endpoints, paths, BlockPos, LineEngine, SeedTable};
use netherpath_jobs::{JobController, JobOutcome, JobRequest};
use netherpath_observability::{init_tracing, LogConfig};

use crate::cli::{Cli, Command, JobArgs};
use crate::console::ConsoleFactory;
use crate::repl::{Repl, ReplConfig};
use crate::session::{Finish, PathSummary};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log = LogConfig::for_service("netherpath_client")
        .with_file_dir(cli.log_file.then(paths::log_dir).flatten());
    if cli.verbose {
        log = log.verbose();
    }
    let _log_guard = init_tracing(&log)?;

    let seeds_path = cli.seeds_file.clone().unwrap_or_else(paths::seeds_path);
    tracing::debug!(seeds_path = %seeds_path.display(), "Using seed table");

    match &cli.command {
        Command::Seeds => {
            let table = SeedTable::load(&seeds_path)?;
            for (server, seed) in table.iter() {
                println!("{server}: {seed}");
            }
        }
        Command::AddSeed { seed, ip } => {
            let mut table = SeedTable::load(&seeds_path)?;
            let ip = ip.as_deref().unwrap_or(&cli.server);
            table.insert(ip, *seed);
            table.save(&seeds_path)?;
            tracing::info!(server = ip, seed, "Seed stored");
            println!("Set seed for {ip}");
        }
        Command::Find { job, coords } => {
            let (start, end) = parse_endpoints(coords.as_slice(), job.player())?;
            find_path(&cli, job, start, end, &seeds_path).await?;
        }
        Command::Thisway { job, yaw, distance } => {
            let player = job.player();
            let end = heading_target(player, *yaw, *distance);
            println!("Going to {end}");
            find_path(&cli, job, player, end, &seeds_path).await?;
        }
        Command::Repl { job, yaw } => {
            let config = ReplConfig {
                server: cli.server.clone(),
                seeds_path: seeds_path.clone(),
                player: job.player(),
                yaw: *yaw,
                seed: job.seed.clone(),
                refine: job.options().refine,
                budget: job.budget,
            };
            let seeds = SeedTable::load_or_default(&seeds_path);
            let mut shell = Repl::new(Arc::new(LineEngine::default()), seeds, config);
            println!("Type `help` for commands, `quit` to leave.");
            repl::run(
                &mut shell,
                repl::stdin_lines()?,
                Duration::from_millis(cli.tick_ms.max(1)),
                interrupted(),
                |line| println!("{line}"),
            )
            .await;
        }
    }

    Ok(())
}

async fn find_path(
    cli: &Cli,
    job: &JobArgs,
    start: BlockPos,
    end: BlockPos,
    seeds_path: &Path,
) -> Result<()> {
    let table = SeedTable::load_or_default(seeds_path);
    let lookup = session::resolve_seed(&table, job.seed.as_deref(), &cli.server)?;
    if let SeedLookup::Defaulted(_) = lookup {
        println!("No seed for server \"{}\", defaulting to 2b2t", cli.server);
    }
    let seed = lookup.seed();

    let engine = Arc::new(LineEngine::default());
    let mut ctrl = JobController::new(engine, ConsoleFactory::new(job.player()));
    let request = JobRequest::new(start, end, seed).with_options(job.options());
    let receipt = ctrl.start(request)?;
    if receipt.replaced_running {
        println!("Canceled existing path finder");
    }

    let started = Instant::now();
    let mut messages = Vec::new();
    let finish = session::run_until_resolved(
        &mut ctrl,
        Duration::from_millis(cli.tick_ms.max(1)),
        interrupted(),
        |ctrl, report| {
            if cli.json {
                messages.extend(report.notices.iter().map(ToString::to_string));
            } else {
                session::describe_tick(ctrl, report)
                    .iter()
                    .for_each(|line| println!("{line}"));
            }
        },
    )
    .await;

    let outcome = match finish {
        Finish::Resolved(outcome) => outcome,
        Finish::Interrupted => {
            println!("Canceled pathfinder");
            return Ok(());
        }
        Finish::Idle => anyhow::bail!("Job {} vanished before resolving", receipt.job_id),
    };
    tracing::info!(
        job_id = receipt.job_id,
        %outcome,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Run finished"
    );

    if cli.json {
        let summary = PathSummary::new(&ctrl, receipt.job_id, seed, outcome, messages);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing path summary")?
        );
    }

    if outcome != JobOutcome::Succeeded {
        anyhow::bail!("Path finder job {} {}", receipt.job_id, outcome);
    }
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
