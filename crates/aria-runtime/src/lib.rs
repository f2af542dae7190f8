//! Aria runtime: builds the knowledge base at startup and answers questions.
//!
//! `load_knowledge_base` runs once before the server binds. The resulting
//! `KnowledgeBase` is immutable and shared by every request through
//! `Assistant`.

pub mod knowledge;
pub mod orchestrator;

pub use knowledge::{load_knowledge_base, IndexOptions, KnowledgeBase};
pub use orchestrator::Assistant;
