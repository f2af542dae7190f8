//! Aria Infer: embedding providers and vector similarity.
//!
//! The `EmbeddingProvider` trait abstracts over embedding generation.
//! With an OpenAI key configured, `OpenAiEmbedder` calls the embeddings API;
//! without one, `NoopEmbedder` fails every call and the knowledge base stays
//! in its not-ready state.

pub mod embedder;
pub mod openai;
pub mod similarity;

pub use embedder::{EmbeddingProvider, NoopEmbedder};
pub use openai::OpenAiEmbedder;
pub use similarity::cosine_similarity;

use std::sync::Arc;

use aria_core::AriaConfig;

/// Create the embedding provider for this configuration.
pub fn create_embedder(config: &AriaConfig, api_key: Option<&str>) -> Arc<dyn EmbeddingProvider> {
    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => match OpenAiEmbedder::new(
            key,
            &config.openai_base_url,
            &config.embedding_model,
            config.provider_timeout,
        ) {
            Ok(embedder) => {
                tracing::info!("Using OpenAI embedder (model={})", config.embedding_model);
                return Arc::new(embedder);
            }
            Err(e) => {
                tracing::warn!("OpenAI embedder unavailable: {}", e);
            }
        },
        None => {
            tracing::warn!("OPENAI_API_KEY not set. Knowledge base cannot be embedded.");
        }
    }

    Arc::new(NoopEmbedder)
}
