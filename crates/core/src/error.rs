// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors an engine call can report instead of a segment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("path finder returned no segment")]
    NoSegment,

    #[error("path finder returned an empty segment")]
    EmptySegment,

    #[error("path finder panicked: {0}")]
    Panicked(String),

    #[error("engine error: {0}")]
    Other(String),
}

/// Errors resolving or persisting seeds.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("No server with name {0}")]
    UnknownServer(String),

    #[error("IO error accessing seed table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed table {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl SeedError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors parsing user-supplied coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordError {
    #[error("Invalid number of arguments({0}), expected 3 or 6")]
    ArgCount(usize),

    #[error("Invalid coordinate: {0}")]
    InvalidNumber(String),
}
