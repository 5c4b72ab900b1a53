//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    collection_items_handler, get_collection_handler, get_item_handler, health_handler,
    invalidate_handler, list_collections_handler, list_items_handler, lookup_collection_handler,
    search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /items` - All items, newest first
/// - `GET /items/:id` - One item
/// - `GET /collections` - Every collection id and caption
/// - `GET /collections/:id` - One collection caption
/// - `GET /collections/:id/items` - Items of one collection
/// - `GET /lookup/collection?caption=` - Collection id by exact caption
/// - `GET /search` - Range and text filtered items
/// - `POST /admin/invalidate` - Drop the cached snapshot
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/items", get(list_items_handler))
        .route("/items/:id", get(get_item_handler))
        .route("/collections", get(list_collections_handler))
        .route("/collections/:id", get(get_collection_handler))
        .route("/collections/:id/items", get(collection_items_handler))
        .route("/lookup/collection", get(lookup_collection_handler))
        .route("/search", get(search_handler))
        .route("/admin/invalidate", post(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
