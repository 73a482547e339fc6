//! Parlance HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use parlance::catalog::{Catalog, JsonCatalog};
use parlance::config::Config;
use parlance::gateway::{create_router, AppState};
use parlance::index::{index_units, QdrantIndex, DEFAULT_COLLECTION_NAME};
use parlance::materialize::materialize_all;
use parlance::pipeline::Pipeline;
use parlance::rerank::{HttpRerankScorer, Reranker, RerankerConfig};
use parlance::retrieval::RetrievalEngine;
use parlance::router::{ConfidenceRouter, RouterConfig};
use parlance::synthesis::{GenaiGenerator, Synthesizer};
use parlance::{Embedder, HttpEmbedder};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        catalog = %config.catalog_path.display(),
        "Parlance starting"
    );

    let catalog = JsonCatalog::new(&config.catalog_path);
    let units = match catalog.list_records() {
        Ok(records) => {
            let units = materialize_all(&records);
            tracing::info!(
                records = records.len(),
                units = units.len(),
                "Catalog materialized"
            );
            units
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load catalog: {}. Serving without domain knowledge.",
                e
            );
            Vec::new()
        }
    };

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(&config.embedder_url));
    let index = Arc::new(QdrantIndex::new(&config.qdrant_url).await?);

    if let Err(e) = index.health_check().await {
        tracing::warn!("Vector index health check failed: {}. Queries will degrade.", e);
    }

    let reindex = std::env::args().any(|arg| arg == "--reindex");
    if reindex {
        let indexed =
            index_units(embedder.as_ref(), index.as_ref(), DEFAULT_COLLECTION_NAME, &units).await?;
        tracing::info!(indexed = indexed, "Reindex complete");
    }

    let engine = RetrievalEngine::new(
        embedder,
        index,
        DEFAULT_COLLECTION_NAME,
        units,
    );

    let reranker = Reranker::new(
        Arc::new(HttpRerankScorer::new(&config.reranker_url)),
        RerankerConfig::default(),
    );

    let router = ConfidenceRouter::new(RouterConfig::default());

    let synthesizer = match &config.generation_model {
        Some(model) => {
            tracing::info!(model = %model, "Generative strategies enabled");
            Some(Synthesizer::new(
                Arc::new(GenaiGenerator::new(model.clone())),
                config.temperature,
                config.max_tokens,
            ))
        }
        None => {
            tracing::warn!(
                "No PARLANCE_GENERATION_MODEL configured, running knowledge-only strategies"
            );
            None
        }
    };

    let pipeline = Pipeline::new(engine, reranker, router, synthesizer)
        .with_limits(config.retrieve_k, config.rerank_top_n);

    let app = create_router(AppState::new(Arc::new(pipeline)));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Parlance shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
