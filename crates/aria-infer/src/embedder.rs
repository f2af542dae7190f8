//! Embedding provider trait and the unavailable fallback.

use async_trait::async_trait;

use aria_core::{Error, Result};

/// Turns text into fixed-dimension vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts in one call. The output has one vector per input,
    /// in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Placeholder embedder used when no provider is configured.
pub struct NoopEmbedder;

#[async_trait]
impl EmbeddingProvider for NoopEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Provider("no embedding provider configured".into()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Provider("no embedding provider configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_embedder_fails() {
        let embedder = NoopEmbedder;
        assert!(embedder.embed("hello").await.is_err());
        assert!(embedder.embed_batch(&["a".into()]).await.is_err());
    }
}
