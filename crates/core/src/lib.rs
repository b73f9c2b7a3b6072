// crates/core/src/lib.rs
pub mod coords;
pub mod engine;
pub mod error;
pub mod line_engine;
pub mod paths;
pub mod seeds;
pub mod types;

pub use coords::*;
pub use engine::*;
pub use error::*;
pub use line_engine::LineEngine;
pub use seeds::SeedTable;
pub use types::*;
