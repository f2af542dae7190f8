//! Startup indexing: documents → chunks → vectors, with a JSON snapshot cache.

use std::path::Path;

use tracing::{error, info, warn};

use aria_chat::HealthResponse;
use aria_core::{Chunk, Error, Result};
use aria_infer::EmbeddingProvider;
use aria_ingest::load_document_chunks;
use aria_store::{Index, IndexSnapshot};

/// How the startup index is built.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub max_chunk_words: usize,
    /// Refuse cached vectors whose digest does not match the fresh chunks.
    pub strict_cache: bool,
    /// Skip the snapshot and always embed.
    pub force_rebuild: bool,
}

/// The corpus as loaded at startup. Ready exactly when an index exists.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    loaded_chunks: usize,
    index: Option<Index>,
}

impl KnowledgeBase {
    pub fn ready(index: Index) -> Self {
        Self {
            loaded_chunks: index.len(),
            index: Some(index),
        }
    }

    pub fn not_ready(loaded_chunks: usize) -> Self {
        Self {
            loaded_chunks,
            index: None,
        }
    }

    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            ready: self.is_ready(),
            loaded_chunks: self.loaded_chunks,
            vector_count: self.index.as_ref().map_or(0, Index::len),
        }
    }
}

/// Load documents and produce the knowledge base.
///
/// Never fails: any error is logged and yields a not-ready base.
pub async fn load_knowledge_base(
    documents_dir: &Path,
    cache_path: &Path,
    embedder: &dyn EmbeddingProvider,
    options: &IndexOptions,
) -> KnowledgeBase {
    let chunks = match load_document_chunks(documents_dir, options.max_chunk_words) {
        Ok(chunks) => chunks,
        Err(e) => {
            error!("Failed to load documents: {}", e);
            return KnowledgeBase::not_ready(0);
        }
    };
    if chunks.is_empty() {
        error!("No document text found in {}; knowledge base not ready", documents_dir.display());
        return KnowledgeBase::not_ready(0);
    }
    let loaded = chunks.len();

    if !options.force_rebuild {
        if let Some(index) = try_load_cache(cache_path, &chunks, options.strict_cache) {
            info!("Loaded {} vectors from cache", index.len());
            return KnowledgeBase::ready(index);
        }
    }

    match build_index(chunks, embedder).await {
        Ok((index, snapshot)) => {
            if let Err(e) = snapshot.save(cache_path) {
                warn!("Failed to save index snapshot: {}", e);
            }
            info!("Knowledge base ready with {} chunks", index.len());
            KnowledgeBase::ready(index)
        }
        Err(e) => {
            error!("Failed to build index: {}", e);
            KnowledgeBase::not_ready(loaded)
        }
    }
}

/// Reuse snapshot vectors when the chunk count still matches.
///
/// The digest is checked as well; a mismatch only warns unless `strict`.
pub fn try_load_cache(cache_path: &Path, chunks: &[Chunk], strict: bool) -> Option<Index> {
    let snapshot = match IndexSnapshot::load(cache_path) {
        Ok(Some(s)) => s,
        Ok(None) => return None,
        Err(e) => {
            warn!("Ignoring unreadable index snapshot: {}", e);
            return None;
        }
    };

    if !snapshot.is_consistent() {
        warn!(
            "Index snapshot is inconsistent ({} chunks, {} vectors); rebuilding",
            snapshot.chunks.len(),
            snapshot.vectors.len()
        );
        return None;
    }
    if snapshot.chunks.len() != chunks.len() {
        info!(
            "Chunk count changed ({} cached, {} now); rebuilding",
            snapshot.chunks.len(),
            chunks.len()
        );
        return None;
    }

    match snapshot.digest_matches(chunks) {
        Some(true) => {}
        Some(false) if strict => {
            info!("Snapshot digest mismatch; rebuilding");
            return None;
        }
        None if strict => {
            info!("Snapshot has no digest; rebuilding");
            return None;
        }
        Some(false) => warn!("Document content changed but chunk count did not; reusing cached vectors"),
        None => warn!("Snapshot has no digest; reusing cached vectors"),
    }

    Index::new(chunks.to_vec(), snapshot.vectors).ok()
}

/// Embed every chunk in a single batched call.
pub async fn build_index(
    chunks: Vec<Chunk>,
    embedder: &dyn EmbeddingProvider,
) -> Result<(Index, IndexSnapshot)> {
    info!("Embedding {} chunks", chunks.len());
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(Error::Provider(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            vectors.len()
        )));
    }

    let snapshot = IndexSnapshot::new(chunks.clone(), vectors.clone());
    let index = Index::new(chunks, vectors)?;
    Ok((index, snapshot))
}
