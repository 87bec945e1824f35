//! Reference receiver for GitHub webhook deliveries

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ghook_receiver=debug".parse()?)
                .add_directive("github=info".parse()?),
        )
        .init();

    info!("Starting GitHub webhook receiver");

    // Load configuration
    let config = common::Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all routes and layers
pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/webhooks/github", post(routes::webhooks::github))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
