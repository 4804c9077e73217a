use axum::{Json, response::IntoResponse};

use super::now_iso;

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": now_iso()
    }))
}
