//! Aria Store: in-memory embedding index, its JSON snapshot, and SQLite
//! storage for captured contacts and feedback.

pub mod index;
pub mod schema;
pub mod snapshot;
pub mod sqlite;
pub mod types;

pub use index::Index;
pub use snapshot::{chunk_digest, IndexSnapshot};
pub use sqlite::SqliteStore;
pub use types::*;
