use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// `GET /health`: liveness plus whether the knowledge resource is cached.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "knowledge_ready": state.replies.knowledge().cached().is_some(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}
