//! Cache Statistics Module
//!
//! Tracks population activity and point-lookup hits and misses.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::ordinals::OrdinalReport;

// == Cache Phase ==
/// Lifecycle phase of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePhase {
    Uninitialized,
    Populating,
    Ready,
}

// == Counters ==
/// Live counters, updated without taking the lifecycle lock.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    populations: AtomicU64,
    population_failures: AtomicU64,
    scan_pages: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_population(&self) {
        self.populations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_population_failure(&self) {
        self.population_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_scan_page(&self) {
        self.scan_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a report; snapshot-derived fields start empty.
    pub(crate) fn report(&self, phase: CachePhase) -> CacheStats {
        CacheStats {
            phase,
            item_count: 0,
            collection_count: 0,
            loaded_at: None,
            ordinals: None,
            populations: self.populations.load(Ordering::Relaxed),
            population_failures: self.population_failures.load(Ordering::Relaxed),
            scan_pages: self.scan_pages.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Point-in-time statistics report.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub phase: CachePhase,
    /// Items in the current snapshot (0 unless ready)
    pub item_count: usize,
    /// Collections in the current snapshot (0 unless ready)
    pub collection_count: usize,
    /// When the current snapshot finished loading
    pub loaded_at: Option<DateTime<Utc>>,
    /// Ordinal validation result of the current snapshot
    pub ordinals: Option<OrdinalReport>,
    /// Completed populations
    pub populations: u64,
    /// Failed populations
    pub population_failures: u64,
    /// Scan pages fetched from the backing store
    pub scan_pages: u64,
    /// Point lookups that found an entry
    pub hits: u64,
    /// Point lookups that found nothing
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the point-lookup hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
