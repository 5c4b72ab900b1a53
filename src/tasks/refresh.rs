//! Catalog Refresh Task
//!
//! Background task that periodically drops the cached snapshot and loads a
//! new one, bounding how stale the catalog can get.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::CatalogCache;

/// Spawns a background task that invalidates and repopulates the catalog
/// cache every `refresh_interval_secs` seconds.
///
/// A failed repopulation is logged and left for the next read (or the next
/// tick) to retry; the task keeps running.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let refresh_handle = spawn_refresh_task(state.catalog.clone(), 600);
/// // Later, during shutdown:
/// refresh_handle.abort();
/// ```
pub fn spawn_refresh_task(catalog: CatalogCache, refresh_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(refresh_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting catalog refresh task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            catalog.invalidate().await;
            match catalog.ensure_populated().await {
                Ok(()) => {
                    let stats = catalog.stats().await;
                    info!(
                        items = stats.item_count,
                        collections = stats.collection_count,
                        "Catalog refresh complete"
                    );
                }
                Err(err) => warn!(error = %err, "Catalog refresh failed; next read will retry"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePhase;
    use crate::models::{EntityKind, UrlTemplates};
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_refresh_task_picks_up_new_rows() {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogCache::new(store.clone(), UrlTemplates::default());
        catalog.ensure_populated().await.unwrap();
        assert_eq!(catalog.stats().await.item_count, 0);

        store
            .insert(
                EntityKind::Item,
                json!({ "itemId": 1, "collectionId": 1 }).as_object().cloned().unwrap(),
            )
            .await;

        let handle = spawn_refresh_task(catalog.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(catalog.phase().await, CachePhase::Ready);
        assert!(catalog.get_item_by_id(1).await.is_ok());
        assert_eq!(store.scans_started(EntityKind::Item), 2);

        handle.abort();
    }

    #[tokio::test]
    async fn test_refresh_task_survives_failures() {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogCache::new(store.clone(), UrlTemplates::default());
        store.fail_next_scans(2);

        let handle = spawn_refresh_task(catalog.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(!handle.is_finished());
        assert!(catalog.stats().await.population_failures >= 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_refresh_task_can_be_aborted() {
        let catalog = CatalogCache::new(Arc::new(MemoryStore::new()), UrlTemplates::default());

        let handle = spawn_refresh_task(catalog, 1);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
