//! API Handlers
//!
//! HTTP request handlers; each one maps onto a single catalog cache
//! operation. A failed population comes back as 503, never as an empty page.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::warn;

use crate::cache::{CatalogCache, CollectionPage, Page};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    CaptionQuery, CollectionResponse, CollectionsResponse, HealthResponse, InvalidateResponse,
    Item, ListQuery, SearchQuery, StatsResponse, UrlTemplates,
};
use crate::store::CatalogStore;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Shared catalog cache
    pub catalog: CatalogCache,
    /// Page size applied when a request omits `page_size`
    pub default_page_size: usize,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    ///
    /// The default page size is clamped into `1..=max_page_size`, so requests
    /// that omit `page_size` are never rejected.
    pub fn new(catalog: CatalogCache, default_page_size: usize) -> Self {
        let max_page_size = catalog.max_page_size();
        if default_page_size > max_page_size {
            warn!(
                default_page_size,
                max_page_size, "default page size exceeds the maximum; clamping"
            );
        }
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            catalog,
        }
    }

    /// Creates a new AppState from configuration and a backing store.
    pub fn from_config(config: &Config, store: Arc<dyn CatalogStore>) -> Self {
        let catalog = CatalogCache::with_max_page_size(
            store,
            UrlTemplates::from_config(config),
            config.max_page_size,
        );
        Self::new(catalog, config.default_page_size)
    }

    fn paging(&self, query: &ListQuery) -> (i64, i64) {
        (
            query.page.unwrap_or(1),
            query
                .page_size
                .unwrap_or(self.default_page_size as i64),
        )
    }
}

/// Handler for GET /items
pub async fn list_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Item>>> {
    let (page, page_size) = state.paging(&query);
    let listed = state.catalog.list_all_items(page, page_size).await?;
    Ok(Json(listed))
}

/// Handler for GET /items/:id
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<u64>,
) -> Result<Json<Item>> {
    let item = state.catalog.get_item_by_id(item_id).await?;
    Ok(Json(item))
}

/// Handler for GET /collections
pub async fn list_collections_handler(
    State(state): State<AppState>,
) -> Result<Json<CollectionsResponse>> {
    let pairs = state.catalog.list_all_collection_captions().await?;
    Ok(Json(CollectionsResponse::from_pairs(pairs)))
}

/// Handler for GET /collections/:id
pub async fn get_collection_handler(
    State(state): State<AppState>,
    Path(collection_id): Path<u64>,
) -> Result<Json<CollectionResponse>> {
    let caption = state.catalog.get_collection_caption(collection_id).await?;
    Ok(Json(CollectionResponse {
        collection_id,
        caption,
    }))
}

/// Handler for GET /collections/:id/items
pub async fn collection_items_handler(
    State(state): State<AppState>,
    Path(collection_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CollectionPage>> {
    let (page, page_size) = state.paging(&query);
    let listed = state
        .catalog
        .list_items_by_collection(collection_id, page, page_size)
        .await?;
    Ok(Json(listed))
}

/// Handler for GET /lookup/collection?caption=
pub async fn lookup_collection_handler(
    State(state): State<AppState>,
    Query(query): Query<CaptionQuery>,
) -> Result<Json<CollectionResponse>> {
    let collection_id = state
        .catalog
        .get_collection_id_by_caption(&query.caption)
        .await?;
    Ok(Json(CollectionResponse {
        collection_id,
        caption: query.caption,
    }))
}

/// Handler for GET /search
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<Item>>> {
    let (filter, paging) = query.into_parts();
    let (page, page_size) = state.paging(&paging);
    let listed = state
        .catalog
        .list_filtered_items(&filter, page, page_size)
        .await?;
    Ok(Json(listed))
}

/// Handler for POST /admin/invalidate
pub async fn invalidate_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    state.catalog.invalidate().await;
    Json(InvalidateResponse::new())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.catalog.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePhase;
    use crate::error::CatalogError;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn row(value: Value) -> crate::models::RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn test_state() -> AppState {
        let store = MemoryStore::with_records(
            vec![
                row(json!({ "itemId": 1, "collectionId": 10, "caption": "Fox", "width": 80, "globalPageOrdinal": 1, "pageWithinCollection": 1 })),
                row(json!({ "itemId": 2, "collectionId": 10, "caption": "Owl", "width": 120, "globalPageOrdinal": 2, "pageWithinCollection": 2 })),
            ],
            vec![row(json!({ "collectionId": 10, "caption": "Animals" }))],
        );
        AppState::from_config(&Config::default(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_list_items_uses_default_page_size() {
        let state = test_state();
        let response = list_items_handler(State(state), Query(ListQuery::default()))
            .await
            .unwrap();
        assert_eq!(response.page_size, Config::default().default_page_size);
        assert_eq!(response.total_items, 2);
        assert_eq!(response.items[0].item_id, 2);
    }

    #[tokio::test]
    async fn test_get_item_handler() {
        let state = test_state();
        let response = get_item_handler(State(state.clone()), Path(1)).await.unwrap();
        assert_eq!(response.caption, "Fox");

        let missing = get_item_handler(State(state), Path(5)).await;
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_collection_handlers() {
        let state = test_state();

        let listed = list_collections_handler(State(state.clone())).await.unwrap();
        assert_eq!(listed.collections.len(), 1);

        let caption = get_collection_handler(State(state.clone()), Path(10)).await.unwrap();
        assert_eq!(caption.caption, "Animals");

        let lookup = lookup_collection_handler(
            State(state.clone()),
            Query(CaptionQuery {
                caption: "Animals".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(lookup.collection_id, 10);

        let items = collection_items_handler(State(state), Path(10), Query(ListQuery::default()))
            .await
            .unwrap();
        assert_eq!(items.caption, "Animals");
        assert_eq!(items.page.total_items, 2);
    }

    #[tokio::test]
    async fn test_search_handler_filters() {
        let state = test_state();
        let query = SearchQuery {
            width_from: Some(100),
            ..Default::default()
        };
        let response = search_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(response.total_items, 1);
        assert_eq!(response.items[0].caption, "Owl");
    }

    #[tokio::test]
    async fn test_invalidate_handler_resets_phase() {
        let state = test_state();
        state.catalog.ensure_populated().await.unwrap();

        let response = invalidate_handler(State(state.clone())).await;
        assert_eq!(response.message, "Catalog cache invalidated");
        assert_eq!(state.catalog.phase().await, CachePhase::Uninitialized);
    }

    #[tokio::test]
    async fn test_default_page_size_clamped_to_max() {
        let config = Config {
            default_page_size: 300,
            max_page_size: 50,
            ..Config::default()
        };
        let state = AppState::from_config(&config, Arc::new(MemoryStore::new()));
        assert_eq!(state.default_page_size, 50);

        let response = list_items_handler(State(state), Query(ListQuery::default()))
            .await
            .unwrap();
        assert_eq!(response.page_size, 50);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
