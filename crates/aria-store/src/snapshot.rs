//! Persisted index snapshot (`embeddings_cache.json`).
//!
//! Layout: `{ "chunks": [{text, source}], "vectors": [[f32]], "digest": "..." }`.
//! Files written by older builds name the vector array `embeddings`; both
//! spellings are read.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use aria_core::{Chunk, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub chunks: Vec<Chunk>,
    #[serde(alias = "embeddings")]
    pub vectors: Vec<Vec<f32>>,
    /// SHA-256 over the chunk sequence at write time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl IndexSnapshot {
    pub fn new(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Self {
        let digest = Some(chunk_digest(&chunks));
        Self {
            chunks,
            vectors,
            digest,
        }
    }

    /// Read a snapshot. `Ok(None)` when no file exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No index snapshot at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };
        let snapshot: Self = serde_json::from_str(&data)?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(
            "Saved index snapshot ({} chunks) to {}",
            self.chunks.len(),
            path.display()
        );
        Ok(())
    }

    /// Chunk and vector arrays have equal length.
    pub fn is_consistent(&self) -> bool {
        self.chunks.len() == self.vectors.len()
    }

    /// Whether the stored digest matches the given chunk sequence.
    /// `None` when the snapshot predates digests.
    pub fn digest_matches(&self, chunks: &[Chunk]) -> Option<bool> {
        self.digest
            .as_ref()
            .map(|stored| *stored == chunk_digest(chunks))
    }
}

/// Content digest of a chunk sequence, order-sensitive.
pub fn chunk_digest(chunks: &[Chunk]) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(chunk.source.as_bytes());
        hasher.update([0u8]);
        hasher.update(chunk.text.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            Chunk::new("Cloud migration services.", "services.docx"),
            Chunk::new("Security audits.", "services.docx"),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings_cache.json");

        let snapshot = IndexSnapshot::new(sample_chunks(), vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
        snapshot.save(&path).unwrap();

        let loaded = IndexSnapshot::load(&path).unwrap().unwrap();
        assert!(loaded.is_consistent());
        assert_eq!(loaded.chunks, sample_chunks());
        assert_eq!(loaded.digest_matches(&sample_chunks()), Some(true));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = IndexSnapshot::load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_reads_legacy_embeddings_key() {
        let json = r#"{
            "chunks": [{"text": "Hello.", "source": "a.pdf"}],
            "embeddings": [[1.0, 0.0]]
        }"#;
        let snapshot: IndexSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.vectors, vec![vec![1.0, 0.0]]);
        assert!(snapshot.digest.is_none());
        assert_eq!(snapshot.digest_matches(&snapshot.chunks), None);
    }

    #[test]
    fn test_digest_is_order_sensitive() {
        let chunks = sample_chunks();
        let mut reversed = chunks.clone();
        reversed.reverse();
        assert_ne!(chunk_digest(&chunks), chunk_digest(&reversed));
    }
}
