//! Ordinal validation
//!
//! Listing order relies on `global_page_ordinal` being unique and dense
//! over `1..=N`, and on `page_within_collection` being unique and dense
//! over `1..=M` inside each collection. The upstream producer is supposed
//! to guarantee both; this pass checks and reports instead of trusting.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Item;

// == Ordinal Report ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrdinalReport {
    /// Items sharing a global ordinal with an earlier item
    pub duplicate_global_ordinals: usize,
    /// Values in `1..=N` that no item carries
    pub missing_global_ordinals: usize,
    /// Collections whose per-collection ordinals are not unique and dense
    pub irregular_collections: Vec<u64>,
}

impl OrdinalReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_global_ordinals == 0
            && self.missing_global_ordinals == 0
            && self.irregular_collections.is_empty()
    }
}

pub fn validate_ordinals(items: &HashMap<u64, Item>) -> OrdinalReport {
    let (duplicate_global_ordinals, missing_global_ordinals) =
        gaps_and_duplicates(items.values().map(|item| item.global_page_ordinal));

    let mut per_collection: HashMap<u64, Vec<u64>> = HashMap::new();
    for item in items.values() {
        per_collection
            .entry(item.collection_id)
            .or_default()
            .push(item.page_within_collection);
    }

    let mut irregular_collections: Vec<u64> = per_collection
        .into_iter()
        .filter(|(_, pages)| gaps_and_duplicates(pages.iter().copied()) != (0, 0))
        .map(|(collection_id, _)| collection_id)
        .collect();
    irregular_collections.sort_unstable();

    OrdinalReport {
        duplicate_global_ordinals,
        missing_global_ordinals,
        irregular_collections,
    }
}

/// Returns `(duplicates, missing)` for ordinals expected to cover `1..=count`.
fn gaps_and_duplicates(ordinals: impl Iterator<Item = u64>) -> (usize, usize) {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for ordinal in ordinals {
        if !seen.insert(ordinal) {
            duplicates += 1;
        }
    }

    let count = (seen.len() + duplicates) as u64;
    let present = seen.iter().filter(|o| (1..=count).contains(*o)).count() as u64;
    (duplicates, (count - present) as usize)
}
