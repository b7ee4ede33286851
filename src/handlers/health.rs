use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "todos": "/api/todos, /api/lists/:id/todos",
                "lists": "/api/lists",
                "users": "/api/users, /api/lists/:id/collaborators",
                "health": "/health",
            },
            "paging": ["limit", "first", "last", "after", "before"],
        }
    }))
}

/// GET /health - database connectivity
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
