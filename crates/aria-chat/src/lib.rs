//! Chat surface: request/response types and external LLM generation.
//!
//! Generation calls go to external APIs with a primary (low-cost) and a
//! fallback (stronger) model per provider.

pub mod config;
pub mod providers;
pub mod types;

pub use config::{LLMConfig, ResolvedProvider};
pub use providers::{create_generator, GenerationProvider, HttpGenerator, UnconfiguredGenerator};
pub use types::*;
