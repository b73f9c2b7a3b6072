// crates/observability/src/lib.rs
//! Tracing setup shared by the netherpath binaries.
//!
//! Console output goes to stderr in compact form. When a log directory is
//! configured, a daily-rolling plain-text copy is written there through a
//! non-blocking appender; keep the returned guard alive until exit so the
//! last lines get flushed.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// File name prefix for rolling log files.
pub const LOG_FILE_PREFIX: &str = "netherpath.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_directive: String,
    /// Where to write rolling log files. `None` disables file output.
    pub file_dir: Option<PathBuf>,
}

impl LogConfig {
    /// Quiet by default: warnings from everything, info from our crates.
    pub fn for_service(service: &str) -> Self {
        Self {
            default_directive: format!(
                "warn,{service}=info,netherpath_jobs=info,netherpath_core=info"
            ),
            file_dir: None,
        }
    }

    pub fn with_file_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.file_dir = dir;
        self
    }

    /// Raise our crates to `debug`.
    pub fn verbose(mut self) -> Self {
        self.default_directive = self.default_directive.replace("=info", "=debug");
        self
    }
}

/// `RUST_LOG` if it parses, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Install the global subscriber. Returns the file appender's guard when
/// file output is enabled.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.default_directive))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(file_layer)
        .try_init()
        .context("installing global tracing subscriber")?;

    Ok(guard)
}
