use anyhow::Result;
// Environment variables
static BACKEND_HOST: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
});
static BACKEND_PORT: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    std::env::var("BACKEND_PORT").unwrap_or_else(|_| "8080".to_string())
});

use clap::Parser;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medichat_agent::{AnswerEngine, MedicalAgent};
use medichat_backend::{SessionStore, MAX_SESSIONS};
use medichat_rag::CorpusIndex;

mod config;
mod cookie;
mod endpoints;

use config::Config;
use cookie::CookieSigner;
use endpoints::{create_router, AppState};

#[derive(Parser)]
#[command(name = "backend")]
#[command(about = "Web backend for the medical RAG chatbot")]
struct Cli {
    /// Directory holding the medical reference corpus
    #[arg(long, default_value = "corpus")]
    corpus_dir: String,

    /// Completion model used for answers
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Passages retrieved per question
    #[arg(long, default_value_t = 3)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let index = build_corpus_index(&cli.corpus_dir).await?;
    let engine: Arc<dyn AnswerEngine> = Arc::new(MedicalAgent::new(
        &config.openai_api_key,
        &cli.model,
        Arc::new(Mutex::new(index)),
        cli.top_k,
    ));

    let sessions = Arc::new(SessionStore::new(MAX_SESSIONS));
    let state = AppState::new(
        engine,
        sessions,
        CookieSigner::new(config.session_secret.as_bytes()),
    );

    let app = create_router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let bind_addr = format!("{}:{}", &*BACKEND_HOST, &*BACKEND_PORT);
    println!("🚀 Backend server starting on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_corpus_index(corpus_dir: &str) -> Result<CorpusIndex> {
    println!("📚 Indexing medical corpus from {corpus_dir}");
    let mut index = CorpusIndex::new().await?;
    let passages = index.load_directory(corpus_dir, 1000, 100).await?;
    println!("  Indexed {passages} passages");
    Ok(index)
}
