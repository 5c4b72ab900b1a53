//! API Module
//!
//! HTTP handlers and routing for the catalog JSON API.
//!
//! # Endpoints
//! - `GET /items`, `GET /items/:id`
//! - `GET /collections`, `GET /collections/:id`, `GET /collections/:id/items`
//! - `GET /lookup/collection?caption=`
//! - `GET /search`
//! - `POST /admin/invalidate`
//! - `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
