//! Aria Core: shared data types, configuration, error handling.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AriaConfig, DataPaths, Persona, DEFAULT_MAX_CHUNK_WORDS};
pub use error::{Error, Result};
pub use types::Chunk;
