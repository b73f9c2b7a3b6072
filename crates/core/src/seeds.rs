// crates/core/src/seeds.rs
//! Seed table keyed by server identifier.
//!
//! Loaded once at startup and rewritten in full whenever an entry changes.
//! The job pipeline only ever sees the resolved [`Seed`].

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SeedError;
use crate::types::{Seed, DEFAULT_SEED};

/// Servers whose seed is known without any configuration.
const BUILTIN_SERVERS: [&str; 2] = ["connect.2b2t.org", "2b2t.org"];

/// Result of looking up the seed for the current server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedLookup {
    /// The server has an entry.
    Known(Seed),
    /// No entry; fell back to [`DEFAULT_SEED`].
    Defaulted(Seed),
}

impl SeedLookup {
    pub fn seed(self) -> Seed {
        match self {
            Self::Known(s) | Self::Defaulted(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTable {
    seeds: BTreeMap<String, Seed>,
}

impl SeedTable {
    /// Empty table plus the built-in servers.
    pub fn new() -> Self {
        Self::from_map(BTreeMap::new())
    }

    fn from_map(mut seeds: BTreeMap<String, Seed>) -> Self {
        for server in BUILTIN_SERVERS {
            seeds.entry(server.to_string()).or_insert(DEFAULT_SEED);
        }
        Self { seeds }
    }

    /// Read the table from `path`. A missing file yields the built-in table.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(SeedError::io(path, e)),
        };
        let seeds: BTreeMap<String, Seed> =
            serde_json::from_str(&raw).map_err(|e| SeedError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_map(seeds))
    }

    /// Like [`SeedTable::load`], but logs and falls back to the built-in
    /// table on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read seed table, using defaults");
                Self::new()
            }
        }
    }

    /// Rewrite the whole table to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SeedError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SeedError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.seeds).map_err(|e| SeedError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| SeedError::io(path, e))
    }

    pub fn get(&self, server: &str) -> Option<Seed> {
        self.seeds.get(server).copied()
    }

    /// Insert or replace a server's seed. Returns the previous value.
    pub fn insert(&mut self, server: impl Into<String>, seed: Seed) -> Option<Seed> {
        self.seeds.insert(server.into(), seed)
    }

    /// Interpret a `--seed` argument: a literal number, else a server name.
    pub fn resolve(&self, arg: &str) -> Result<Seed, SeedError> {
        if let Ok(seed) = arg.parse::<Seed>() {
            return Ok(seed);
        }
        self.get(arg)
            .ok_or_else(|| SeedError::UnknownServer(arg.to_string()))
    }

    /// Seed for the server the client is connected to.
    pub fn seed_for_server(&self, server: &str) -> SeedLookup {
        match self.get(server) {
            Some(seed) => SeedLookup::Known(seed),
            None => SeedLookup::Defaulted(DEFAULT_SEED),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Seed)> {
        self.seeds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl Default for SeedTable {
    fn default() -> Self {
        Self::new()
    }
}
