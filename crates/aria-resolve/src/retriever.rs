//! Similarity retrieval over the in-memory index.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use aria_core::{Chunk, Result};
use aria_infer::{cosine_similarity, EmbeddingProvider};
use aria_store::Index;

static PRODUCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bproducts?\b").unwrap());
static SERVICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bservices?\b").unwrap());

/// Domain phrases appended to a query before embedding. The user-visible
/// question is never changed.
#[derive(Debug, Clone)]
pub struct QueryExpansion {
    pub product: String,
    pub service: String,
    pub generic: String,
}

impl QueryExpansion {
    pub fn for_organization(org: &str) -> Self {
        Self {
            product: format!(
                "{}'s AI products, platforms, and proprietary tools such as assistants, RAG, AI automation, and chatbots.",
                org
            ),
            service: format!(
                "{}'s enterprise services including SAP, integration, cloud, AI automation, cybersecurity, and consulting.",
                org
            ),
            generic: format!("{}'s AI offerings, solutions, innovations, and expertise.", org),
        }
    }

    pub fn expand(&self, query: &str) -> String {
        let phrase = if PRODUCT_RE.is_match(query) {
            &self.product
        } else if SERVICE_RE.is_match(query) {
            &self.service
        } else {
            &self.generic
        };
        format!("{} {}", query, phrase)
    }
}

/// A chunk with its similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

/// Score every chunk, keep those strictly above `threshold`, best first,
/// at most `top_k`.
pub fn rank_chunks<'a>(
    index: &'a Index,
    query_vector: &[f32],
    threshold: f32,
    top_k: usize,
) -> Vec<ScoredChunk<'a>> {
    let mut scored: Vec<ScoredChunk<'a>> = index
        .entries()
        .map(|(chunk, vector)| ScoredChunk {
            chunk,
            score: cosine_similarity(query_vector, vector),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
        .into_iter()
        .filter(|s| s.score > threshold)
        .take(top_k)
        .collect()
}

/// Expands, embeds and ranks a query against an index.
#[derive(Debug, Clone)]
pub struct Retriever {
    expansion: QueryExpansion,
    threshold: f32,
}

impl Retriever {
    pub fn new(expansion: QueryExpansion, threshold: f32) -> Self {
        Self {
            expansion,
            threshold,
        }
    }

    /// One embedding call, then a linear scan.
    pub async fn retrieve_scored<'a>(
        &self,
        index: &'a Index,
        embedder: &dyn EmbeddingProvider,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk<'a>>> {
        let expanded = self.expansion.expand(query);
        let query_vector = embedder.embed(&expanded).await?;
        let ranked = rank_chunks(index, &query_vector, self.threshold, top_k);
        debug!(
            "Retrieved {} chunks with similarity > {}",
            ranked.len(),
            self.threshold
        );
        Ok(ranked)
    }

    pub async fn retrieve(
        &self,
        index: &Index,
        embedder: &dyn EmbeddingProvider,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<Chunk>> {
        let scored = self.retrieve_scored(index, embedder, query, top_k).await?;
        Ok(scored.into_iter().map(|s| s.chunk.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct FixedEmbedder {
        vector: Vec<f32>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.lock().push(text.to_string());
            Ok(self.vector.clone())
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.vector.clone()).collect())
        }
    }

    fn index() -> Index {
        let chunks = vec![
            Chunk::new("weak", "a.txt"),
            Chunk::new("best", "a.txt"),
            Chunk::new("zero", "a.txt"),
            Chunk::new("good", "a.txt"),
            Chunk::new("opposite", "a.txt"),
        ];
        let vectors = vec![
            vec![0.5, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 0.0],
            vec![1.0, 0.5],
            vec![-1.0, 0.0],
        ];
        Index::new(chunks, vectors).unwrap()
    }

    #[test]
    fn test_threshold_is_strict_and_sorted() {
        let index = index();
        let ranked = rank_chunks(&index, &[1.0, 0.0], 0.6, 10);
        let texts: Vec<&str> = ranked.iter().map(|s| s.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["best", "good"]);
        assert!(ranked.iter().all(|s| s.score > 0.6));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_score_equal_to_threshold_is_dropped() {
        let index = index();
        let ranked = rank_chunks(&index, &[1.0, 0.0], 1.0, 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let index = index();
        let ranked = rank_chunks(&index, &[1.0, 0.0], 0.0, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].chunk.text, "best");
    }

    #[test]
    fn test_nothing_clears_threshold() {
        let index = index();
        assert!(rank_chunks(&index, &[0.0, -1.0], 0.6, 8).is_empty());
    }

    #[test]
    fn test_query_expansion_categories() {
        let exp = QueryExpansion::for_organization("Acme");
        assert!(exp.expand("What products do you sell?").ends_with(&exp.product));
        assert!(exp.expand("List your SERVICES").ends_with(&exp.service));
        assert!(exp.expand("Who are you?").ends_with(&exp.generic));
        // Product wins when both words appear.
        assert!(exp.expand("products and services").ends_with(&exp.product));
        // Whole words only.
        assert!(exp.expand("serviceable parts").ends_with(&exp.generic));
    }

    #[tokio::test]
    async fn test_retrieve_embeds_expanded_query_once() {
        let index = index();
        let embedder = FixedEmbedder {
            vector: vec![1.0, 0.0],
            calls: Mutex::new(Vec::new()),
        };
        let retriever = Retriever::new(QueryExpansion::for_organization("Acme"), 0.6);
        let chunks = retriever
            .retrieve(&index, &embedder, "Tell me about services", 8)
            .await
            .unwrap();

        assert_eq!(chunks.len(), 2);
        let calls = embedder.calls.lock().clone();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("Tell me about services Acme's enterprise services"));
    }
}
