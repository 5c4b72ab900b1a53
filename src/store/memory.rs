//! In-memory catalog store
//!
//! Holds raw rows per entity kind and pages over them like a remote table
//! would. Scan calls are counted, and failures or latency can be injected,
//! which is what the cache tests lean on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::record::ATTR_ITEM_ID;
use crate::models::{EntityKind, RawRecord};
use crate::store::{page_of, parse_offset_token, CatalogStore, ScanPage};

const DEFAULT_PAGE_LIMIT: usize = 25;

// == Memory Store ==
#[derive(Debug)]
pub struct MemoryStore {
    rows: RwLock<HashMap<EntityKind, Vec<RawRecord>>>,
    page_limit: usize,
    latency: Duration,
    scan_calls: AtomicUsize,
    item_scans_started: AtomicUsize,
    collection_scans_started: AtomicUsize,
    item_scans_in_flight: AtomicUsize,
    peak_item_scans_in_flight: AtomicUsize,
    failures_remaining: AtomicUsize,
}

/// Decrements an in-flight counter when the scan call ends or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryStore {
    // == Constructors ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    /// Creates a store seeded with raw item and collection rows.
    pub fn with_records(items: Vec<RawRecord>, collections: Vec<RawRecord>) -> Self {
        let mut rows = HashMap::new();
        rows.insert(EntityKind::Item, items);
        rows.insert(EntityKind::Collection, collections);

        Self {
            rows: RwLock::new(rows),
            page_limit: DEFAULT_PAGE_LIMIT,
            latency: Duration::ZERO,
            scan_calls: AtomicUsize::new(0),
            item_scans_started: AtomicUsize::new(0),
            collection_scans_started: AtomicUsize::new(0),
            item_scans_in_flight: AtomicUsize::new(0),
            peak_item_scans_in_flight: AtomicUsize::new(0),
            failures_remaining: AtomicUsize::new(0),
        }
    }

    /// Sets how many rows each scan page returns.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Delays every scan call, widening the window for concurrent callers.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    // == Mutation ==
    /// Appends a raw row of the given kind.
    pub async fn insert(&self, kind: EntityKind, record: RawRecord) {
        self.rows.write().await.entry(kind).or_default().push(record);
    }

    /// Removes item rows whose `itemId` equals `item_id`. Returns the count removed.
    pub async fn remove_item(&self, item_id: u64) -> usize {
        let mut rows = self.rows.write().await;
        let items = rows.entry(EntityKind::Item).or_default();
        let before = items.len();
        items.retain(|row| {
            row.get(ATTR_ITEM_ID).and_then(serde_json::Value::as_u64) != Some(item_id)
        });
        before - items.len()
    }

    /// Makes the next `count` scan calls fail.
    pub fn fail_next_scans(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    // == Instrumentation ==
    /// Total scan calls received, across kinds and pages.
    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    /// Number of scan sequences started (first-page calls) for `kind`.
    pub fn scans_started(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Item => self.item_scans_started.load(Ordering::SeqCst),
            EntityKind::Collection => self.collection_scans_started.load(Ordering::SeqCst),
        }
    }

    /// Highest number of item scan calls ever running at the same time.
    pub fn peak_item_scans_in_flight(&self) -> usize {
        self.peak_item_scans_in_flight.load(Ordering::SeqCst)
    }

    fn track_item_scan(&self) -> InFlight<'_> {
        let running = self.item_scans_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_item_scans_in_flight.fetch_max(running, Ordering::SeqCst);
        InFlight(&self.item_scans_in_flight)
    }

    fn take_failure(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn scan(&self, kind: EntityKind, token: Option<&str>) -> anyhow::Result<ScanPage> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let _in_flight = (kind == EntityKind::Item).then(|| self.track_item_scan());
        if token.is_none() {
            match kind {
                EntityKind::Item => self.item_scans_started.fetch_add(1, Ordering::SeqCst),
                EntityKind::Collection => {
                    self.collection_scans_started.fetch_add(1, Ordering::SeqCst)
                }
            };
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.take_failure() {
            anyhow::bail!("injected scan failure for {} rows", kind);
        }

        let offset = parse_offset_token(token)?;
        let rows = self.rows.read().await;
        let page = page_of(
            rows.get(&kind).map(Vec::as_slice).unwrap_or_default(),
            offset,
            self.page_limit,
        );
        debug!(%kind, offset, returned = page.records.len(), "memory store scan");
        Ok(page)
    }
}
