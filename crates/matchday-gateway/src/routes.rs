//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use matchday_tracker::ChannelCategory;

use crate::server::AppState;

/// Root banner — keeps uptime monitors happy.
pub async fn banner() -> &'static str {
    "Matchday bot rodando"
}

/// Liveness probe.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Snapshot of the tracked fixture state.
pub async fn tracked_state(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = state.engine.lock().await;
    Json(serde_json::to_value(engine.state()).unwrap_or_else(|_| serde_json::json!({})))
}

#[derive(Debug, Deserialize)]
pub struct BindRequest {
    pub category: String,
    pub channel_id: String,
}

/// Bind a notification category to a channel.
/// The only externally triggered state mutation outside the tick pipeline.
pub async fn bind_channel(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BindRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(category) = ChannelCategory::parse(&body.category) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "ok": false,
                "error": format!("Unknown category '{}'", body.category),
            })),
        );
    };

    let mut engine = state.engine.lock().await;
    match engine.bind_channel(category, &body.channel_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"ok": true, "category": category.as_str()})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"ok": false, "error": e.to_string()})),
        ),
    }
}
