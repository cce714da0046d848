//! mathq server binary: startup wiring and the serve loop.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mathq_embeddings::{
    EmbeddingService, MockEmbeddingService, OpenAiEmbeddingConfig, OpenAiEmbeddingService,
};
use mathq_llm::{LanguageService, MockLanguageService, OpenAiChatConfig, OpenAiChatService};
use mathq_server::{AppState, build_router, recorder};
use mathq_settings::{MathqSettings, load_settings};
use mathq_workflow::{SessionStore, SimilarityClassifier, WorkflowController};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Dimension used by the mock embedder under `--mock-providers`.
const MOCK_EMBEDDING_DIMS: usize = 256;

/// mathq: guided refinement and deduplication of mathematical questions.
#[derive(Parser, Debug)]
#[command(name = "mathq", version)]
struct Args {
    /// Path to a JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus JSON path (overrides settings).
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Bind address (overrides settings), e.g. 127.0.0.1:9000.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Run with deterministic mock collaborators instead of OpenAI.
    /// For local smoke-testing without credentials.
    #[arg(long)]
    mock_providers: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref()).context("loading settings")?;
    if let Some(corpus) = &args.corpus {
        settings.corpus.path = corpus.display().to_string();
    }

    let prometheus = recorder::install_recorder().context("installing metrics recorder")?;

    let (language, embedder) = build_collaborators(&settings, args.mock_providers)?;

    let corpus =
        mathq_core::load_corpus(Path::new(&settings.corpus.path)).context("loading corpus")?;
    info!(questions = corpus.len(), path = %settings.corpus.path, "corpus loaded");

    // Fatal on empty or misaligned corpus: serving without a working
    // similarity index would silently approve duplicates.
    let classifier = SimilarityClassifier::build(
        embedder,
        corpus,
        settings.similarity.top_k,
        settings.similarity.score_threshold,
    )
    .await
    .context("building similarity index")?;

    let controller = Arc::new(WorkflowController::new(
        SessionStore::new(settings.sessions.max_sessions),
        Arc::new(classifier),
        language,
    ));

    let router = build_router(AppState::new(controller, prometheus));

    let addr = match args.addr {
        Some(addr) => addr,
        None => {
            let host: IpAddr = settings
                .server
                .host
                .parse()
                .with_context(|| format!("invalid bind host {:?}", settings.server.host))?;
            SocketAddr::new(host, settings.server.port)
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "mathq serving");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

/// Construct the language and embedding collaborators.
///
/// Real providers share one HTTP client carrying the configured request
/// timeout, so every collaborator call is bounded.
fn build_collaborators(
    settings: &MathqSettings,
    mock: bool,
) -> anyhow::Result<(Arc<dyn LanguageService>, Arc<dyn EmbeddingService>)> {
    if mock {
        info!("using mock collaborators (--mock-providers)");
        return Ok((
            Arc::new(MockLanguageService::new()),
            Arc::new(MockEmbeddingService::new(MOCK_EMBEDDING_DIMS)),
        ));
    }

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set (pass --mock-providers to run without it)")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.openai.request_timeout_secs))
        .build()
        .context("building HTTP client")?;

    let language = OpenAiChatService::with_client(
        OpenAiChatConfig {
            api_key: api_key.clone(),
            model: settings.openai.chat_model.clone(),
            base_url: settings.openai.base_url.clone(),
            temperature: settings.openai.temperature,
        },
        client.clone(),
    );

    let embedder = OpenAiEmbeddingService::with_client(
        OpenAiEmbeddingConfig {
            api_key,
            model: settings.openai.embedding_model.clone(),
            base_url: settings.openai.base_url.clone(),
        },
        client,
    );

    info!(
        chat_model = %settings.openai.chat_model,
        embedding_model = %settings.openai.embedding_model,
        "openai collaborators configured"
    );

    Ok((Arc::new(language), Arc::new(embedder)))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
