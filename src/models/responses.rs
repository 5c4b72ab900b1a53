//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// One entry of `GET /collections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub collection_id: u64,
    pub caption: String,
}

/// Response body for `GET /collections`
#[derive(Debug, Clone, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<CollectionSummary>,
}

impl CollectionsResponse {
    /// Builds the response sorted by collection id for stable output.
    pub fn from_pairs(pairs: Vec<(u64, String)>) -> Self {
        let mut collections: Vec<CollectionSummary> = pairs
            .into_iter()
            .map(|(collection_id, caption)| CollectionSummary {
                collection_id,
                caption,
            })
            .collect();
        collections.sort_by_key(|c| c.collection_id);
        Self { collections }
    }
}

/// Response body for `GET /collections/:id` and `GET /lookup/collection`
pub type CollectionResponse = CollectionSummary;

/// Response body for `POST /admin/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
}

impl InvalidateResponse {
    pub fn new() -> Self {
        Self {
            message: "Catalog cache invalidated".to_string(),
        }
    }
}

impl Default for InvalidateResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
pub type StatsResponse = CacheStats;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
