//! Scenario Engine - HTTP host for the action resolution pipeline
//!
//! The Engine:
//! - Classifies free-text player actions against bilingual pattern rules
//! - Computes luck-biased success rates and effect values
//! - Integrates with Ollama for the assistant and narrator calls

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenario_engine::infrastructure::config::AppConfig;
use scenario_engine::infrastructure::http;
use scenario_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenario_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Scenario Engine");

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  LLM: {}", config.llm_base_url);
    tracing::info!(
        "  Assistant: {} ({})",
        config.assistant_model,
        if config.assistant_enabled { "enabled" } else { "disabled" }
    );
    tracing::info!(
        "  Narrator: {} ({})",
        config.narrator_model,
        if config.narrator_enabled { "enabled" } else { "disabled" }
    );
    let port = config.server_port;

    // Initialize application state
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Application state initialized");

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
