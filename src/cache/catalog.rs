//! Catalog Cache Module
//!
//! Read-through cache over the catalog store. The first read (or the first
//! read after `invalidate`) triggers one full scan; every caller arriving
//! while that scan runs waits on the same attempt. The scan runs in its own
//! task, so a caller that gives up waiting does not cancel it for others.
//!
//! Snapshots are point-in-time. Rows written to the store after the last
//! population stay invisible until the next `invalidate`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::cache::filter::ItemFilter;
use crate::cache::loader::load_snapshot;
use crate::cache::page::{CollectionPage, Page, PageRequest};
use crate::cache::snapshot::CatalogSnapshot;
use crate::cache::stats::{CachePhase, CacheStats, StatsCounters};
use crate::cache::DEFAULT_MAX_PAGE_SIZE;
use crate::error::{CatalogError, Result};
use crate::models::{Item, UrlTemplates};
use crate::store::CatalogStore;

/// Result of one population attempt; `None` while it is still running.
type Outcome = Option<Result<Arc<CatalogSnapshot>>>;

enum Phase {
    Uninitialized,
    Populating {
        attempt: u64,
        outcome: watch::Receiver<Outcome>,
    },
    Ready(Arc<CatalogSnapshot>),
}

struct Lifecycle {
    phase: Phase,
    /// Bumped by every population start and every invalidation
    epoch: u64,
}

struct Shared {
    store: Arc<dyn CatalogStore>,
    urls: UrlTemplates,
    max_page_size: usize,
    lifecycle: Mutex<Lifecycle>,
    stats: StatsCounters,
}

// == Catalog Cache ==
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct CatalogCache {
    shared: Arc<Shared>,
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCache")
            .field("urls", &self.shared.urls)
            .field("max_page_size", &self.shared.max_page_size)
            .finish_non_exhaustive()
    }
}

impl CatalogCache {
    // == Constructor ==
    /// Creates an uninitialized cache over `store`. Nothing is read until
    /// the first query.
    pub fn new(store: Arc<dyn CatalogStore>, urls: UrlTemplates) -> Self {
        Self::with_max_page_size(store, urls, DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn with_max_page_size(
        store: Arc<dyn CatalogStore>,
        urls: UrlTemplates,
        max_page_size: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                urls,
                max_page_size: max_page_size.max(1),
                lifecycle: Mutex::new(Lifecycle {
                    phase: Phase::Uninitialized,
                    epoch: 0,
                }),
                stats: StatsCounters::default(),
            }),
        }
    }

    // == Population ==
    /// Makes sure a snapshot is loaded, starting or joining a population
    /// as needed.
    pub async fn ensure_populated(&self) -> Result<()> {
        self.snapshot().await.map(|_| ())
    }

    /// Returns the current snapshot, populating first if needed.
    ///
    /// Concurrent callers share a single population attempt. If it fails,
    /// every one of them gets the error and the cache is left uninitialized,
    /// so the next call starts over.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        let (attempt, mut outcome) = {
            let mut lifecycle = self.shared.lifecycle.lock().await;
            let in_flight = match &lifecycle.phase {
                Phase::Ready(snapshot) => return Ok(Arc::clone(snapshot)),
                Phase::Populating { attempt, outcome } => Some((*attempt, outcome.clone())),
                Phase::Uninitialized => None,
            };
            match in_flight {
                Some(joined) => {
                    debug!(attempt = joined.0, "joining in-flight catalog population");
                    joined
                }
                None => self.start_population(&mut lifecycle),
            }
        };

        let received = outcome
            .wait_for(Option::is_some)
            .await
            .map(|published| (*published).clone());

        match received {
            Ok(Some(result)) => result,
            Ok(None) => Err(CatalogError::Internal(
                "population finished without an outcome".to_string(),
            )),
            Err(_) => {
                // The population task went away without reporting, most
                // likely a panic inside the store.
                self.abandon_attempt(attempt).await;
                Err(CatalogError::Population(
                    "population task ended without a result".to_string(),
                ))
            }
        }
    }

    fn start_population(&self, lifecycle: &mut Lifecycle) -> (u64, watch::Receiver<Outcome>) {
        let (tx, rx) = watch::channel(None);
        lifecycle.epoch += 1;
        let attempt = lifecycle.epoch;
        lifecycle.phase = Phase::Populating {
            attempt,
            outcome: rx.clone(),
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.populate(attempt, tx).await;
        });

        (attempt, rx)
    }

    async fn abandon_attempt(&self, attempt: u64) {
        let mut lifecycle = self.shared.lifecycle.lock().await;
        if matches!(lifecycle.phase, Phase::Populating { attempt: a, .. } if a == attempt) {
            lifecycle.phase = Phase::Uninitialized;
            self.shared.stats.record_population_failure();
            warn!(attempt, "abandoned catalog population without a result");
        }
    }

    // == Invalidation ==
    /// Drops the current snapshot; the next query repopulates.
    ///
    /// If a population is in flight, waits for it to finish (successfully or
    /// not) before clearing, and keeps waiting while readers start new ones.
    /// The phase is only reset under the same lock that saw it settled, so a
    /// running scan is never orphaned. Readers still holding an older
    /// snapshot keep it.
    pub async fn invalidate(&self) {
        let previous = loop {
            let mut lifecycle = self.shared.lifecycle.lock().await;
            let in_flight = match &lifecycle.phase {
                Phase::Populating { attempt, outcome } => Some((*attempt, outcome.clone())),
                _ => None,
            };
            let Some((attempt, mut outcome)) = in_flight else {
                lifecycle.epoch += 1;
                break std::mem::replace(&mut lifecycle.phase, Phase::Uninitialized);
            };
            drop(lifecycle);

            debug!(attempt, "invalidate waiting for in-flight population");
            if outcome.wait_for(Option::is_some).await.is_err() {
                self.abandon_attempt(attempt).await;
            }
        };

        self.shared.stats.record_invalidation();
        match previous {
            Phase::Ready(snapshot) => info!(
                items = snapshot.item_count(),
                collections = snapshot.collection_count(),
                "catalog cache invalidated"
            ),
            _ => info!("catalog cache invalidated"),
        }
    }

    // == Point Queries ==
    /// Looks up one item. `NotFound` after a successful population means the
    /// id is not in the current snapshot; there is no store fallback.
    pub async fn get_item_by_id(&self, item_id: u64) -> Result<Item> {
        let snapshot = self.snapshot().await?;
        let item = snapshot.item(item_id).cloned();
        self.record_lookup(item.is_some());
        item.ok_or_else(|| CatalogError::NotFound(format!("item {}", item_id)))
    }

    pub async fn get_collection_caption(&self, collection_id: u64) -> Result<String> {
        let snapshot = self.snapshot().await?;
        let caption = snapshot.collection_caption(collection_id).map(str::to_string);
        self.record_lookup(caption.is_some());
        caption.ok_or_else(|| CatalogError::NotFound(format!("collection {}", collection_id)))
    }

    /// Exact, case-sensitive caption match.
    pub async fn get_collection_id_by_caption(&self, caption: &str) -> Result<u64> {
        let snapshot = self.snapshot().await?;
        let collection_id = snapshot.collection_id_by_caption(caption);
        self.record_lookup(collection_id.is_some());
        collection_id
            .ok_or_else(|| CatalogError::NotFound(format!("collection captioned '{}'", caption)))
    }

    /// `(collection_id, caption)` for every collection, unordered.
    pub async fn list_all_collection_captions(&self) -> Result<Vec<(u64, String)>> {
        Ok(self.snapshot().await?.collection_captions())
    }

    // == Listings ==
    pub async fn list_all_items(&self, page: i64, page_size: i64) -> Result<Page<Item>> {
        let request = self.page_request(page, page_size)?;
        Ok(self.snapshot().await?.list_all_items(request))
    }

    pub async fn list_items_by_collection(
        &self,
        collection_id: u64,
        page: i64,
        page_size: i64,
    ) -> Result<CollectionPage> {
        let request = self.page_request(page, page_size)?;
        Ok(self
            .snapshot()
            .await?
            .list_items_by_collection(collection_id, request))
    }

    pub async fn list_filtered_items(
        &self,
        filter: &ItemFilter,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Item>> {
        let request = self.page_request(page, page_size)?;
        Ok(self.snapshot().await?.list_filtered_items(filter, request))
    }

    // == Introspection ==
    pub async fn phase(&self) -> CachePhase {
        let lifecycle = self.shared.lifecycle.lock().await;
        match lifecycle.phase {
            Phase::Uninitialized => CachePhase::Uninitialized,
            Phase::Populating { .. } => CachePhase::Populating,
            Phase::Ready(_) => CachePhase::Ready,
        }
    }

    /// Reports statistics without triggering a population.
    pub async fn stats(&self) -> CacheStats {
        let lifecycle = self.shared.lifecycle.lock().await;
        match &lifecycle.phase {
            Phase::Ready(snapshot) => {
                let mut stats = self.shared.stats.report(CachePhase::Ready);
                stats.item_count = snapshot.item_count();
                stats.collection_count = snapshot.collection_count();
                stats.loaded_at = Some(snapshot.loaded_at());
                stats.ordinals = Some(snapshot.ordinal_report().clone());
                stats
            }
            Phase::Populating { .. } => self.shared.stats.report(CachePhase::Populating),
            Phase::Uninitialized => self.shared.stats.report(CachePhase::Uninitialized),
        }
    }

    pub fn max_page_size(&self) -> usize {
        self.shared.max_page_size
    }

    fn page_request(&self, page: i64, page_size: i64) -> Result<PageRequest> {
        PageRequest::new(page, page_size, self.shared.max_page_size)
    }

    fn record_lookup(&self, hit: bool) {
        if hit {
            self.shared.stats.record_hit();
        } else {
            self.shared.stats.record_miss();
        }
    }
}

impl Shared {
    /// Runs one population attempt and publishes its outcome. The snapshot
    /// is only installed if no invalidation happened since the attempt began.
    async fn populate(&self, attempt: u64, tx: watch::Sender<Outcome>) {
        let started = Instant::now();
        info!(attempt, "populating catalog cache");

        let outcome = load_snapshot(self.store.as_ref(), &self.urls, &self.stats)
            .await
            .map(Arc::new);

        {
            let mut lifecycle = self.lifecycle.lock().await;
            let current = lifecycle.epoch == attempt;
            match &outcome {
                Ok(snapshot) => {
                    self.stats.record_population();
                    if current {
                        lifecycle.phase = Phase::Ready(Arc::clone(snapshot));
                    }
                    info!(
                        attempt,
                        items = snapshot.item_count(),
                        collections = snapshot.collection_count(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        installed = current,
                        "catalog cache ready"
                    );
                }
                Err(err) => {
                    self.stats.record_population_failure();
                    if current {
                        lifecycle.phase = Phase::Uninitialized;
                    }
                    error!(attempt, error = %err, "catalog population failed");
                }
            }
        }

        tx.send_replace(Some(outcome));
    }
}
