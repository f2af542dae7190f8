//! Resolvers: everything that decides what a question gets back.
//!
//! All of it is pure except `Retriever::retrieve`, which embeds the query.
//! The runtime crate sequences these steps and performs generation calls.

pub mod answer;
pub mod contact;
pub mod intent;
pub mod replies;
pub mod retriever;
pub mod topics;

pub use contact::{contact_step, parse_extraction, ContactStep};
pub use intent::{Intent, IntentClassifier};
pub use retriever::{QueryExpansion, Retriever, ScoredChunk};
pub use topics::{TopicAnalysis, TopicRedirector};
