mod cases;
mod config;
mod db;
mod draft;
mod errors;
mod export;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::draft::transcript::HttpTranscriptSource;
use crate::export::renderer::PdfMonkeyRenderer;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{build_s3_client, S3ObjectStore};
use crate::store::PgCaseStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting casekit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let cases = PgCaseStore::new(db);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let objects = S3ObjectStore::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_public_url.clone(),
    );
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize completion client
    let completion = LlmClient::new(
        config.completion_api_url.clone(),
        config.completion_api_key.clone(),
        config.completion_model.clone(),
        config.completion_timeout,
    )?;
    info!("LLM client initialized (model: {})", completion.model());

    let transcripts = HttpTranscriptSource::new(config.http_timeout)?;

    let renderer = PdfMonkeyRenderer::new(
        config.render_api_url.clone(),
        config.render_api_key.clone(),
        config.http_timeout,
        config.render_poll_interval,
        config.render_max_polls,
    )?;
    info!(
        "Renderer initialized ({}, up to {} polls every {:?})",
        config.render_api_url, config.render_max_polls, config.render_poll_interval
    );

    // Build app state
    let state = AppState {
        cases: Arc::new(cases),
        objects: Arc::new(objects),
        transcripts: Arc::new(transcripts),
        completion: Arc::new(completion),
        renderer: Arc::new(renderer),
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
