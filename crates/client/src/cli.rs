// crates/client/src/cli.rs
//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use netherpath_core::BlockPos;
use netherpath_jobs::JobOptions;

/// Where the player stands when `--player` is not given.
pub const DEFAULT_PLAYER: BlockPos = BlockPos::new(0, 64, 0);

#[derive(Debug, Parser)]
#[command(name = "netherpath", version, about = "Find paths through the nether")]
pub struct Cli {
    /// Seed table to read and write instead of the one in the app data dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub seeds_file: Option<PathBuf>,

    /// Foreground tick period in milliseconds.
    #[arg(long, global = true, default_value_t = 50, value_name = "MS")]
    pub tick_ms: u64,

    /// Server identifier used to pick the default seed.
    #[arg(long, global = true, default_value = "localhost")]
    pub server: String,

    /// Print the result as JSON instead of progress lines.
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug-level logging for netherpath crates.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to the app data dir.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Path to `X Y Z`, or from `X Y Z` to `X Y Z`. `~` is relative to the player.
    Find {
        #[command(flatten)]
        job: JobArgs,
        #[arg(required = true, num_args = 3..=6, allow_hyphen_values = true, value_name = "COORDS")]
        coords: Vec<String>,
    },
    /// Path to a point DISTANCE blocks away along the player's heading.
    Thisway {
        #[command(flatten)]
        job: JobArgs,
        /// Heading in degrees (0 faces +Z, 90 faces -X).
        #[arg(long, allow_hyphen_values = true)]
        yaw: f32,
        distance: i32,
    },
    /// Store the seed for a server.
    AddSeed {
        #[arg(allow_hyphen_values = true)]
        seed: i64,
        /// Server to store it for; defaults to `--server`.
        #[arg(long)]
        ip: Option<String>,
    },
    /// List known seeds.
    Seeds,
    /// Interactive session: read commands from stdin against one controller.
    Repl {
        #[command(flatten)]
        job: JobArgs,
        /// Starting heading in degrees.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        yaw: f32,
    },
}

#[derive(Debug, Clone, Args)]
pub struct JobArgs {
    /// Player position; relative coordinates and the render origin use it.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
    pub player: Option<Vec<i32>>,

    /// Seed, or the name of a server in the seed table.
    #[arg(long)]
    pub seed: Option<String>,

    /// Keep raw engine output instead of simplifying each segment.
    #[arg(long)]
    pub no_refine: bool,

    /// Engine iteration budget per call.
    #[arg(long, default_value_t = netherpath_jobs::types::DEFAULT_ITERATION_BUDGET)]
    pub budget: i32,
}

impl JobArgs {
    pub fn player(&self) -> BlockPos {
        match self.player.as_deref() {
            Some(&[x, y, z]) => BlockPos::new(x, y, z),
            _ => DEFAULT_PLAYER,
        }
    }

    pub fn options(&self) -> JobOptions {
        JobOptions {
            refine: !self.no_refine,
            iteration_budget: self.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("netherpath").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_find_with_relative_and_negative_coords() {
        let cli = parse(&["find", "--player", "10", "70", "-5", "~", "~-8", "-300"]);
        let Command::Find { job, coords } = cli.command else {
            panic!("expected find");
        };
        assert_eq!(coords, vec!["~", "~-8", "-300"]);
        assert_eq!(job.player(), BlockPos::new(10, 70, -5));
        assert_eq!(job.options(), JobOptions::default());
    }

    #[test]
    fn test_find_rejects_too_few_coords() {
        assert!(Cli::try_parse_from(["netherpath", "find", "1", "2"]).is_err());
    }

    #[test]
    fn test_global_flags_and_job_options() {
        let cli = parse(&[
            "--tick-ms", "20", "--server", "2b2t.org", "find", "--seed", "7", "--no-refine",
            "--budget", "500", "1", "64", "1",
        ]);
        assert_eq!(cli.tick_ms, 20);
        assert_eq!(cli.server, "2b2t.org");
        let Command::Find { job, .. } = cli.command else {
            panic!("expected find");
        };
        assert_eq!(job.seed.as_deref(), Some("7"));
        assert_eq!(job.player(), DEFAULT_PLAYER);
        assert_eq!(
            job.options(),
            JobOptions {
                refine: false,
                iteration_budget: 500
            }
        );
    }

    #[test]
    fn test_thisway_and_add_seed() {
        let cli = parse(&["thisway", "--yaw", "-90", "1000"]);
        assert!(matches!(
            cli.command,
            Command::Thisway { yaw, distance: 1000, .. } if yaw == -90.0
        ));

        let cli = parse(&["add-seed", "-42", "--ip", "example.org"]);
        assert!(matches!(
            cli.command,
            Command::AddSeed { seed: -42, ip: Some(ref ip) } if ip == "example.org"
        ));
    }

    #[test]
    fn test_repl_takes_session_defaults() {
        let cli = parse(&["repl", "--player", "5", "70", "-5", "--yaw", "-45", "--no-refine"]);
        let Command::Repl { job, yaw } = cli.command else {
            panic!("expected repl");
        };
        assert_eq!(yaw, -45.0);
        assert_eq!(job.player(), BlockPos::new(5, 70, -5));
        assert!(!job.options().refine);
    }
}
