//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{LLMProvider, ModelTier};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_FALLBACK_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_ANTHROPIC_FALLBACK_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_FALLBACK_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored LLM configuration (read from llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_fallback_model")]
    pub openai_fallback_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_anthropic_fallback_model")]
    pub anthropic_fallback_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_groq_fallback_model")]
    pub groq_fallback_model: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_openai_fallback_model() -> String {
    DEFAULT_OPENAI_FALLBACK_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_anthropic_fallback_model() -> String {
    DEFAULT_ANTHROPIC_FALLBACK_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_groq_fallback_model() -> String {
    DEFAULT_GROQ_FALLBACK_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            openai_fallback_model: default_openai_fallback_model(),
            anthropic_model: default_anthropic_model(),
            anthropic_fallback_model: default_anthropic_fallback_model(),
            groq_model: default_groq_model(),
            groq_fallback_model: default_groq_fallback_model(),
        }
    }
}

/// The provider, models and key chosen for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub primary_model: String,
    pub fallback_model: String,
    pub api_key: String,
}

impl ResolvedProvider {
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Primary => &self.primary_model,
            ModelTier::Fallback => &self.fallback_model,
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        // Env vars as fallback for API keys
        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = std::env::var("GROQ_API_KEY").ok();
        }

        info!(
            "LLM config loaded from {} (preferred provider: {})",
            config_path.display(),
            config.preferred_provider
        );
        config
    }

    /// Resolve which provider and models to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        let openai = || self.resolved(LLMProvider::OpenAI);
        let anthropic = || self.resolved(LLMProvider::Anthropic);
        let groq = || self.resolved(LLMProvider::Groq);

        match self.preferred_provider.as_str() {
            "openai" => openai(),
            "anthropic" => anthropic(),
            "groq" => groq(),
            // Auto mode: OpenAI > Anthropic > Groq
            "auto" => openai().or_else(anthropic).or_else(groq),
            _ => None,
        }
    }

    fn resolved(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, primary, fallback) = match provider {
            LLMProvider::OpenAI => (
                &self.openai_api_key,
                &self.openai_model,
                &self.openai_fallback_model,
            ),
            LLMProvider::Anthropic => (
                &self.anthropic_api_key,
                &self.anthropic_model,
                &self.anthropic_fallback_model,
            ),
            LLMProvider::Groq => (
                &self.groq_api_key,
                &self.groq_model,
                &self.groq_fallback_model,
            ),
        };
        key.as_ref()
            .filter(|k| !k.trim().is_empty())
            .map(|k| ResolvedProvider {
                provider,
                primary_model: primary.clone(),
                fallback_model: fallback.clone(),
                api_key: k.clone(),
            })
    }
}
