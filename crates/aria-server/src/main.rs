//! Aria: document-grounded Q&A assistant server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use aria_chat::{create_generator, LLMConfig};
use aria_core::AriaConfig;
use aria_runtime::{load_knowledge_base, Assistant, IndexOptions};
use aria_server::{build_router, AppState};
use aria_store::SqliteStore;

fn resolve_data_dir() -> PathBuf {
    std::env::var("ARIA_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn index_options(config: &AriaConfig, force_rebuild: bool) -> IndexOptions {
    IndexOptions {
        max_chunk_words: config.retrieval.max_chunk_words,
        strict_cache: config.strict_cache_validation,
        force_rebuild,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--rebuild-index" | "rebuild-index" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let config = AriaConfig::from_env(&data_dir)?;
                let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
                let embedder =
                    aria_infer::create_embedder(&config, llm_config.openai_api_key.as_deref());
                let knowledge = load_knowledge_base(
                    &config.data_paths.documents,
                    &config.data_paths.index_cache,
                    embedder.as_ref(),
                    &index_options(&config, true),
                )
                .await;
                let health = knowledge.health();
                println!(
                    "ready={} chunks={} vectors={}",
                    health.ready, health.loaded_chunks, health.vector_count
                );
                std::process::exit(if health.ready { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                println!("Aria: document-grounded Q&A assistant");
                println!();
                println!("Usage: aria [command]");
                println!();
                println!("Commands:");
                println!("  (none)                      Start the server");
                println!("  rebuild-index [data-dir]    Re-embed all documents, ignoring the cache");
                println!("  help                        Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'aria help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = AriaConfig::from_env(&data_dir)?;
    let port = config.port;

    let store = SqliteStore::open(&config.data_paths.database)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let embedder = aria_infer::create_embedder(&config, llm_config.openai_api_key.as_deref());
    let generator = create_generator(&llm_config, config.provider_timeout);

    // The index is built before the listener binds.
    let knowledge = load_knowledge_base(
        &config.data_paths.documents,
        &config.data_paths.index_cache,
        embedder.as_ref(),
        &index_options(&config, false),
    )
    .await;
    if !knowledge.is_ready() {
        tracing::warn!("Knowledge base not ready; questions will get a not-ready reply");
    }

    let assistant = Assistant::new(
        &config,
        Arc::new(knowledge),
        embedder,
        generator,
        Arc::new(store),
    );
    let state = Arc::new(AppState::new(config, assistant));

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Aria server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
