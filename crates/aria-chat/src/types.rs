//! Chat types matching the chat widget's API surface.

use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Anthropic,
    Groq,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Which model a completion runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Low-cost model used for grounded answers, extraction and definitions.
    Primary,
    /// Stronger model used once when the grounded answer comes back empty.
    Fallback,
}

/// A single-prompt completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub tier: ModelTier,
    pub temperature: f64,
    pub max_tokens: Option<usize>,
    /// Ask the provider for a JSON object response.
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, tier: ModelTier, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            tier,
            temperature,
            max_tokens: None,
            json_output: false,
        }
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Greeting,
    Restricted,
    System,
    ContactRequest,
    ContactRetry,
    ContactConfirmation,
    TopicRedirect,
    Fallback,
    KnowledgeBase,
    Error,
}

/// Incoming question.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Answer to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: AnswerSource,
}

impl AskResponse {
    pub fn new(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }

    pub fn is_error(&self) -> bool {
        self.source == AnswerSource::Error
    }
}

/// Incoming feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
}

/// Knowledge base readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub ready: bool,
    #[serde(rename = "loadedChunks")]
    pub loaded_chunks: usize,
    #[serde(rename = "vectorCount")]
    pub vector_count: usize,
}
