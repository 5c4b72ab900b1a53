//! Full-scan loader
//!
//! Pages through the backing store once per entity kind and maps every row
//! into a fresh snapshot. Nothing here touches live cache state: the result
//! only becomes visible when the lifecycle installs it.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::cache::snapshot::CatalogSnapshot;
use crate::cache::stats::StatsCounters;
use crate::error::{CatalogError, Result};
use crate::models::{
    collection_from_record, item_from_record, Collection, EntityKind, Item, RawRecord,
    UrlTemplates,
};
use crate::store::CatalogStore;

/// Scans both entity kinds and builds a snapshot. Any scan error fails the
/// whole load and the partially-read rows are dropped.
pub(crate) async fn load_snapshot(
    store: &dyn CatalogStore,
    urls: &UrlTemplates,
    stats: &StatsCounters,
) -> Result<CatalogSnapshot> {
    let (item_rows, collection_rows) = tokio::try_join!(
        scan_all(store, EntityKind::Item, stats),
        scan_all(store, EntityKind::Collection, stats),
    )?;

    let item_total = item_rows.len();
    let items: HashMap<u64, Item> = item_rows
        .iter()
        .filter_map(|row| item_from_record(row, urls))
        .map(|item| (item.item_id, item))
        .collect();

    let collection_total = collection_rows.len();
    let collections: HashMap<u64, Collection> = collection_rows
        .iter()
        .filter_map(collection_from_record)
        .map(|collection| (collection.collection_id, collection))
        .collect();

    if items.len() < item_total || collections.len() < collection_total {
        warn!(
            dropped_items = item_total - items.len(),
            dropped_collections = collection_total - collections.len(),
            "discarded malformed or duplicate catalog rows"
        );
    }

    let snapshot = CatalogSnapshot::new(items, collections);
    let report = snapshot.ordinal_report();
    if !report.is_clean() {
        warn!(
            duplicate_global = report.duplicate_global_ordinals,
            missing_global = report.missing_global_ordinals,
            irregular_collections = ?report.irregular_collections,
            "catalog ordinals are not unique and dense; listing order may be unstable"
        );
    }

    info!(
        items = snapshot.item_count(),
        collections = snapshot.collection_count(),
        "catalog rows loaded"
    );
    Ok(snapshot)
}

/// Follows continuation tokens until the store reports the end of `kind`.
async fn scan_all(
    store: &dyn CatalogStore,
    kind: EntityKind,
    stats: &StatsCounters,
) -> Result<Vec<RawRecord>> {
    let mut rows = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .scan(kind, token.as_deref())
            .await
            .map_err(|err| CatalogError::Population(format!("{} scan failed: {:#}", kind, err)))?;
        stats.record_scan_page();
        pages += 1;
        rows.extend(page.records.iter().cloned());

        let next = match page.continuation() {
            Some(next) => next.to_string(),
            None => break,
        };
        if token.as_deref() == Some(next.as_str()) {
            return Err(CatalogError::Population(format!(
                "{} scan did not advance past continuation token '{}'",
                kind, next
            )));
        }
        token = Some(next);
    }

    debug!(%kind, pages, rows = rows.len(), "scan complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fixtures::{collection_row, item_row, sample_rows};
    use crate::store::{MemoryStore, ScanPage};
    use async_trait::async_trait;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_walks_every_page() {
        let items = (1..=7).map(|id| item_row(id, 1, id, id)).collect();
        let store = MemoryStore::with_records(items, vec![collection_row(1, "Birds")])
            .with_page_limit(3);
        let stats = StatsCounters::default();

        let snapshot = load_snapshot(&store, &UrlTemplates::default(), &stats)
            .await
            .unwrap();

        assert_eq!(snapshot.item_count(), 7);
        assert_eq!(snapshot.collection_count(), 1);
        assert!(snapshot.ordinal_report().is_clean());
        // 3 item pages + 1 collection page
        assert_eq!(store.scan_calls(), 4);
        assert_eq!(stats.report(crate::cache::CachePhase::Ready).scan_pages, 4);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_discarded() {
        let (mut items, collections) = sample_rows();
        items.push(json!({ "itemId": 0, "collectionId": 10 }).as_object().cloned().unwrap());
        items.push(json!({ "caption": "orphan" }).as_object().cloned().unwrap());
        let store = MemoryStore::with_records(items, collections);

        let snapshot = load_snapshot(&store, &UrlTemplates::default(), &StatsCounters::default())
            .await
            .unwrap();
        assert_eq!(snapshot.item_count(), 3);
    }

    #[tokio::test]
    async fn test_scan_error_fails_the_load() {
        let (items, collections) = sample_rows();
        let store = MemoryStore::with_records(items, collections);
        store.fail_next_scans(1);

        let err = load_snapshot(&store, &UrlTemplates::default(), &StatsCounters::default())
            .await
            .unwrap_err();
        assert!(err.is_population_failure());
        assert!(err.to_string().contains("injected scan failure"));
    }

    struct StuckStore;

    #[async_trait]
    impl CatalogStore for StuckStore {
        async fn scan(&self, _kind: EntityKind, _token: Option<&str>) -> anyhow::Result<ScanPage> {
            Ok(ScanPage {
                records: Vec::new(),
                next_token: Some("same".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_non_advancing_token_is_a_failure() {
        let err = load_snapshot(&StuckStore, &UrlTemplates::default(), &StatsCounters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Population(msg) if msg.contains("did not advance")));
    }
}
