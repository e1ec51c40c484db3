mod config;
mod errors;
mod llm_client;
mod routes;
mod sign;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::sign::level::SystemClock;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lucky Sign API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.llm_api_key.clone(), &config.llm_base_url)
        .context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.llm_base_url
    );
    info!("Allowed origins: {:?}", config.allowed_origins);

    let state = AppState {
        llm,
        config: config.clone(),
        clock: Arc::new(SystemClock),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
