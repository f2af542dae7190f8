//! External LLM completion clients.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API. Completions are single-prompt and non-streaming.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::{LLMConfig, ResolvedProvider};
use crate::types::{CompletionRequest, LLMProvider};
use aria_core::{Error, Result};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
/// Anthropic requires an explicit output cap.
const ANTHROPIC_DEFAULT_MAX_TOKENS: usize = 1024;

/// Produces text for a prompt on a given model tier.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Create the generator for the resolved provider, or one that always fails
/// when no provider is configured.
pub fn create_generator(config: &LLMConfig, timeout: Duration) -> Arc<dyn GenerationProvider> {
    match config.resolve_provider() {
        Some(resolved) => match HttpGenerator::new(resolved, timeout) {
            Ok(generator) => {
                info!(
                    "Using {} for generation (primary={}, fallback={})",
                    generator.resolved.provider,
                    generator.resolved.primary_model,
                    generator.resolved.fallback_model
                );
                Arc::new(generator)
            }
            Err(e) => {
                warn!("Generator unavailable: {}", e);
                Arc::new(UnconfiguredGenerator)
            }
        },
        None => {
            warn!("No LLM provider configured; answers will report errors");
            Arc::new(UnconfiguredGenerator)
        }
    }
}

/// HTTP client for the configured provider.
pub struct HttpGenerator {
    client: Client,
    resolved: ResolvedProvider,
}

impl HttpGenerator {
    pub fn new(resolved: ResolvedProvider, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, resolved })
    }

    async fn complete_openai_compat(&self, url: &str, request: &CompletionRequest) -> Result<String> {
        let model = self.resolved.model_for(request.tier);
        let mut body = json!({
            "model": model,
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if request.json_output {
            body["response_format"] = json!({"type": "json_object"});
        }

        debug!("Completion from {} with model {}", url, model);

        let parsed = self
            .post_json(
                self.client
                    .post(url)
                    .header("Authorization", format!("Bearer {}", self.resolved.api_key)),
                &body,
            )
            .await?;

        Ok(parsed["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let model = self.resolved.model_for(request.tier);
        let mut prompt = request.prompt.clone();
        if request.json_output {
            prompt.push_str("\nRespond with the JSON object only.");
        }
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
        });

        debug!("Completion from Anthropic with model {}", model);

        let parsed = self
            .post_json(
                self.client
                    .post(ANTHROPIC_MESSAGES_URL)
                    .header("x-api-key", &self.resolved.api_key)
                    .header("anthropic-version", "2023-06-01"),
                &body,
            )
            .await?;

        let text = parsed["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| b["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        Ok(text)
    }

    async fn post_json(&self, builder: reqwest::RequestBuilder, body: &Value) -> Result<Value> {
        let response = builder
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("{} API error {}: {}", self.resolved.provider, status, body);
            return Err(Error::Provider(format!("API error {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Provider(format!("Malformed completion response: {}", e)))
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerator {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self.resolved.provider {
            LLMProvider::OpenAI => self.complete_openai_compat(OPENAI_CHAT_URL, request).await,
            LLMProvider::Groq => self.complete_openai_compat(GROQ_CHAT_URL, request).await,
            LLMProvider::Anthropic => self.complete_anthropic(request).await,
        }
    }
}

/// Generator used when no provider is configured.
pub struct UnconfiguredGenerator;

#[async_trait]
impl GenerationProvider for UnconfiguredGenerator {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        Err(Error::Provider("No LLM provider configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelTier;

    #[tokio::test]
    async fn test_unconfigured_generator_fails() {
        let generator = UnconfiguredGenerator;
        let req = CompletionRequest::new("hello", ModelTier::Primary, 0.1);
        assert!(matches!(
            generator.complete(&req).await,
            Err(Error::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_create_generator_without_keys() {
        let config = LLMConfig {
            preferred_provider: "groq".into(),
            ..Default::default()
        };
        let generator = create_generator(&config, Duration::from_secs(1));
        let req = CompletionRequest::new("hello", ModelTier::Fallback, 0.4);
        assert!(generator.complete(&req).await.is_err());
    }
}
