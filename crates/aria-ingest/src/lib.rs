//! Aria Ingest: document text extraction, sentence chunking, corpus loading.

pub mod chunking;
pub mod file;
pub mod ingest;

pub use chunking::{chunk_text, OVERLAP_WORDS};
pub use file::{extract_text, FileType};
pub use ingest::load_document_chunks;
