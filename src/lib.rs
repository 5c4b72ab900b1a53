//! Stitch Catalog - read-through cache over a cross-stitch pattern catalog
//!
//! Mirrors the catalog's items and collections in memory, populated lazily
//! by a single-flight full scan of the backing store, and answers point
//! lookups and paginated listings from memory.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::CatalogCache;
pub use config::Config;
pub use error::CatalogError;
pub use tasks::spawn_refresh_task;
