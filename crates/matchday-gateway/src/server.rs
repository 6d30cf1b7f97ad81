//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use matchday_core::config::GatewayConfig;
use matchday_tracker::TrackerEngine;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    /// The tracker engine — shared with the tick and calendar loops, so
    /// admin mutations serialize behind running ticks.
    pub engine: Arc<Mutex<TrackerEngine>>,
    pub start_time: std::time::Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(super::routes::banner))
        .route("/healthz", get(super::routes::health_check))
        .route("/api/v1/state", get(super::routes::tracked_state))
        .route("/api/v1/channels/bind", post(super::routes::bind_channel))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(
    config: &GatewayConfig,
    engine: Arc<Mutex<TrackerEngine>>,
) -> anyhow::Result<()> {
    let state = AppState {
        engine,
        start_time: std::time::Instant::now(),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
