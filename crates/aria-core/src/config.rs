//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Origins the chat widget is served from during local development.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
    "http://localhost:5173",
];

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Paths to all Aria data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Source documents to index (`data/upload/`).
    pub documents: PathBuf,
    /// Persisted index snapshot (`data/embeddings_cache.json`).
    pub index_cache: PathBuf,
    /// Contact and feedback database (`data/aria.db`).
    pub database: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let documents = std::env::var("ARIA_DOCS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| root.join("upload"));
        let paths = Self {
            documents,
            index_cache: root.join("embeddings_cache.json"),
            database: root.join("aria.db"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.documents)?;
        Ok(())
    }
}

/// Who the assistant is and whom it speaks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub assistant_name: String,
    pub organization: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            assistant_name: "Aria".into(),
            organization: "Tekisho Infotech".into(),
        }
    }
}

/// Word budget per chunk unless `ARIA_MAX_CHUNK_WORDS` says otherwise.
pub const DEFAULT_MAX_CHUNK_WORDS: usize = 180;

/// Retrieval and chunking knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Maximum retrieved chunks handed to the answer stage.
    pub top_k: usize,
    /// Chunks must score strictly above this cosine similarity.
    pub similarity_threshold: f32,
    /// Word budget per chunk before overlap is added.
    pub max_chunk_words: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 8,
            similarity_threshold: 0.6,
            max_chunk_words: DEFAULT_MAX_CHUNK_WORDS,
        }
    }
}

/// Top-level Aria configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AriaConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub persona: Persona,
    pub retrieval: RetrievalSettings,
    /// CORS origins allowed to call the API.
    pub allowed_origins: Vec<String>,
    /// Deadline applied to every embedding or generation request.
    pub provider_timeout: Duration,
    /// Require the snapshot digest to match before reusing cached vectors.
    pub strict_cache_validation: bool,
    pub embedding_model: String,
    pub openai_base_url: String,
}

impl AriaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_parse("PORT").unwrap_or(5000);
        let data_paths = DataPaths::new(data_dir)?;

        let defaults = Persona::default();
        let persona = Persona {
            assistant_name: std::env::var("ARIA_ASSISTANT_NAME")
                .unwrap_or(defaults.assistant_name),
            organization: std::env::var("ARIA_ORGANIZATION").unwrap_or(defaults.organization),
        };

        let defaults = RetrievalSettings::default();
        let retrieval = RetrievalSettings {
            top_k: env_parse("ARIA_TOP_K").unwrap_or(defaults.top_k),
            similarity_threshold: env_parse("ARIA_SIMILARITY_THRESHOLD")
                .unwrap_or(defaults.similarity_threshold),
            max_chunk_words: env_parse("ARIA_MAX_CHUNK_WORDS")
                .unwrap_or(defaults.max_chunk_words),
        };

        let allowed_origins = std::env::var("ARIA_ALLOWED_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect());

        let timeout_secs: u64 = env_parse("ARIA_PROVIDER_TIMEOUT_SECS").unwrap_or(60);

        Ok(Self {
            port,
            data_paths,
            persona,
            retrieval,
            allowed_origins,
            provider_timeout: Duration::from_secs(timeout_secs),
            strict_cache_validation: env_flag("ARIA_STRICT_CACHE"),
            embedding_model: std::env::var("ARIA_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.into()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into()),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}; using default", key, raw);
            None
        }
    }
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
