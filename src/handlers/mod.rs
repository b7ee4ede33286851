// handlers/mod.rs - list endpoints
//
// Every list endpoint follows the same path: typed filters from the query
// string, a factory-built QueryNode, then one page from the repository.

pub mod health;
pub mod lists;
pub mod todos;
pub mod users;

use axum::{http::Uri, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;

pub fn router() -> Router {
    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/todos", get(todos::list))
        .route("/api/lists", get(lists::list))
        .route("/api/lists/:id/todos", get(todos::list_for_list))
        .route("/api/lists/:id/collaborators", get(users::collaborators))
        .route("/api/users", get(users::list))
        .fallback(unknown_route)
        .layer(CorsLayer::permissive());

    if crate::config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
