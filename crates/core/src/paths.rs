// crates/core/src/paths.rs
//! Centralized path functions for app storage locations.

use std::path::PathBuf;

/// File name of the persisted seed table.
pub const SEEDS_FILE_NAME: &str = "pathfinder_seeds.json";

/// App data root: `~/.local/share/netherpath/` (Linux) or
/// `~/Library/Application Support/netherpath/` (macOS).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("netherpath"))
}

/// Seed table location: `<app_data_dir>/pathfinder_seeds.json`, or the
/// working directory when no data dir can be resolved.
pub fn seeds_path() -> PathBuf {
    app_data_dir()
        .map(|d| d.join(SEEDS_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SEEDS_FILE_NAME))
}

/// Directory for rolling log files: `<app_data_dir>/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|d| d.join("logs"))
}
