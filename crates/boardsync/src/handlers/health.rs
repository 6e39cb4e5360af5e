use axum::response::Response;

use crate::response::success;

/// Liveness probe (GET /api/health).
pub async fn health() -> Response {
    success(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
