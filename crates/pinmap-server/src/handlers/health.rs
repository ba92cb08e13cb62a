use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// 健康检查处理器
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let check = state.store.health_check().await;
    let stats = state.store.stats().await;

    match (check, stats) {
        (Ok(()), Ok(stats)) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": timestamp,
                "storage": state.store.backend(),
                "memories": stats.total_memories,
                "placeable": stats.placeable_memories,
            })),
        ),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": timestamp,
                    "storage": state.store.backend(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}
