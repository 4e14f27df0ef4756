mod analysis;
mod cache;
mod config;
mod embedding;
mod errors;
mod llm_client;
mod matching;
mod models;
mod profiles;
mod ranking;
mod requirements;
mod retrieval;
mod retry;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::CandidateAnalyzer;
use crate::config::Config;
use crate::embedding::{CachedEmbeddingProvider, HttpEmbeddingProvider};
use crate::llm_client::LlmClient;
use crate::profiles::{DisabledProfileStore, PgProfileStore, ProfileStore};
use crate::ranking::engine::RankingEngine;
use crate::requirements::heuristic::HeuristicRequirementExtractor;
use crate::requirements::llm::LlmRequirementExtractor;
use crate::requirements::{CachedRequirementExtractor, RequirementExtractor};
use crate::retrieval::backend::OpenSearchClient;
use crate::retrieval::{RetrievalEngine, RetrievalSettings};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Requirement extraction and candidate analysis: language model when a key is configured
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(llm)
        }
        None => {
            info!("No ANTHROPIC_API_KEY set; using pattern-based requirement extraction");
            info!("Candidate analysis is disabled");
            None
        }
    };
    let extractor: Arc<dyn RequirementExtractor> = match &llm {
        Some(llm) => Arc::new(LlmRequirementExtractor::new(llm.clone())),
        None => Arc::new(HeuristicRequirementExtractor),
    };
    let analyzer = llm.map(|llm| Arc::new(CandidateAnalyzer::new(Arc::new(llm))));
    let extractor = Arc::new(CachedRequirementExtractor::new(
        extractor,
        config.requirements_cache_ttl,
    ));
    info!(
        "Requirement cache TTL: {}s",
        extractor.cache().ttl().as_secs()
    );

    // Embeddings
    let embedder = Arc::new(CachedEmbeddingProvider::new(
        Arc::new(HttpEmbeddingProvider::new(
            config.embedding_endpoint.clone(),
            config.embedding_api_key.clone(),
            config.embedding_dimensions,
            config.search_timeout,
        )?),
        config.embedding_cache_ttl,
    ));
    info!(
        "Embedding provider initialized ({} dimensions, cache TTL {}s)",
        config.embedding_dimensions,
        embedder.cache().ttl().as_secs()
    );

    // Search backend
    let backend = OpenSearchClient::new(
        config.opensearch_endpoint.clone(),
        config.opensearch_credentials.clone(),
        config.search_timeout,
    )?;
    let mut settings = RetrievalSettings::new(config.opensearch_index.clone());
    settings.hybrid_steepness = config.hybrid_score_steepness;
    settings.fallback_steepness = config.fallback_score_steepness;
    info!(
        "Search backend: {} (index {}, worst-case retry wait {:?} per strategy)",
        config.opensearch_endpoint,
        settings.index,
        settings.retry.max_total_wait()
    );
    let retrieval = RetrievalEngine::new(Arc::new(backend), settings);

    // Profile store
    let profiles: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => Arc::new(PgProfileStore::connect(url).await?),
        None => {
            info!("No DATABASE_URL set; candidate profiles will be synthesized");
            Arc::new(DisabledProfileStore)
        }
    };

    // Build app state
    let state = AppState {
        ranking: Arc::new(RankingEngine::new(
            extractor,
            embedder,
            retrieval,
            profiles.clone(),
            config.resume_bucket.clone(),
        )),
        profiles,
        analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
