use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. The relay holds no connections, so it is healthy while it serves.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "neo-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
