//! Catalog Snapshot Module
//!
//! An immutable, fully-populated view of the catalog. Every read query runs
//! against a snapshot; invalidation swaps snapshots out rather than clearing
//! maps in place, so a reader never sees a half-built or half-cleared map.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::filter::ItemFilter;
use crate::cache::ordinals::{validate_ordinals, OrdinalReport};
use crate::cache::page::{paginate, CollectionPage, Page, PageRequest};
use crate::models::{Collection, Item};

// == Catalog Snapshot ==
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    items: HashMap<u64, Item>,
    collections: HashMap<u64, Collection>,
    ordinals: OrdinalReport,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    // == Constructor ==
    /// Builds a snapshot and runs ordinal validation over its items.
    pub fn new(items: HashMap<u64, Item>, collections: HashMap<u64, Collection>) -> Self {
        let ordinals = validate_ordinals(&items);
        Self {
            items,
            collections,
            ordinals,
            loaded_at: Utc::now(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn ordinal_report(&self) -> &OrdinalReport {
        &self.ordinals
    }

    // == Point Lookups ==
    pub fn item(&self, item_id: u64) -> Option<&Item> {
        self.items.get(&item_id)
    }

    pub fn collection_caption(&self, collection_id: u64) -> Option<&str> {
        self.collections
            .get(&collection_id)
            .map(|collection| collection.caption.as_str())
    }

    /// Exact, case-sensitive caption match. If several collections share a
    /// caption the lowest id wins, so the answer does not depend on map order.
    pub fn collection_id_by_caption(&self, caption: &str) -> Option<u64> {
        self.collections
            .values()
            .filter(|collection| collection.caption == caption)
            .map(|collection| collection.collection_id)
            .min()
    }

    /// All collections as `(collection_id, caption)` pairs, in no particular order.
    pub fn collection_captions(&self) -> Vec<(u64, String)> {
        self.collections
            .values()
            .map(|collection| (collection.collection_id, collection.caption.clone()))
            .collect()
    }

    // == Listings ==
    /// Every item, highest global ordinal first.
    pub fn list_all_items(&self, request: PageRequest) -> Page<Item> {
        let mut ordered: Vec<&Item> = self.items.values().collect();
        ordered.sort_unstable_by(|a, b| {
            b.global_page_ordinal
                .cmp(&a.global_page_ordinal)
                .then(b.item_id.cmp(&a.item_id))
        });
        paginate(&ordered, request)
    }

    /// Items of one collection, highest per-collection ordinal first.
    pub fn list_items_by_collection(
        &self,
        collection_id: u64,
        request: PageRequest,
    ) -> CollectionPage {
        let mut ordered: Vec<&Item> = self
            .items
            .values()
            .filter(|item| item.collection_id == collection_id)
            .collect();
        ordered.sort_unstable_by(|a, b| {
            b.page_within_collection
                .cmp(&a.page_within_collection)
                .then(b.item_id.cmp(&a.item_id))
        });

        let caption = self
            .collection_caption(collection_id)
            .map(str::to_string)
            .unwrap_or_else(|| Collection::fallback_caption(collection_id));

        CollectionPage {
            collection_id,
            caption,
            page: paginate(&ordered, request),
        }
    }

    /// Items passing `filter`, highest item id first.
    pub fn list_filtered_items(&self, filter: &ItemFilter, request: PageRequest) -> Page<Item> {
        let predicate = filter.predicate();
        let mut ordered: Vec<&Item> = self
            .items
            .values()
            .filter(|item| predicate.matches(item, self.collection_caption(item.collection_id)))
            .collect();
        ordered.sort_unstable_by(|a, b| b.item_id.cmp(&a.item_id));
        paginate(&ordered, request)
    }
}
