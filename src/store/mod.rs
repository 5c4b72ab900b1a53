//! Backing Store Module
//!
//! The cache only ever reads the catalog table through a paginated scan.
//! Implementations:
//! - `MemoryStore`: in-process rows with scan instrumentation
//! - `JsonFileStore`: pages over a JSON catalog export on disk

mod file;
mod memory;

use async_trait::async_trait;

use crate::models::{EntityKind, RawRecord};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

// == Scan Page ==
/// One page of a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Raw rows of the requested kind
    pub records: Vec<RawRecord>,
    /// Token for the next page; `None` or empty ends the scan
    pub next_token: Option<String>,
}

impl ScanPage {
    /// Continuation token, treating an empty token as the end of the scan.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}

// == Catalog Store Trait ==
/// Paginated read access to the catalog table.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the page of `kind` rows starting at `token`
    /// (`None` for the first page).
    async fn scan(&self, kind: EntityKind, token: Option<&str>) -> anyhow::Result<ScanPage>;
}

/// Decodes an offset-style continuation token shared by the bundled stores.
pub(crate) fn parse_offset_token(token: Option<&str>) -> anyhow::Result<usize> {
    match token {
        None => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("malformed continuation token '{}'", raw)),
    }
}

/// Slices `rows` into one scan page of at most `limit` records.
pub(crate) fn page_of(rows: &[RawRecord], offset: usize, limit: usize) -> ScanPage {
    let start = offset.min(rows.len());
    let end = start.saturating_add(limit.max(1)).min(rows.len());
    let next_token = (end < rows.len()).then(|| end.to_string());

    ScanPage {
        records: rows[start..end].to_vec(),
        next_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: u64) -> Vec<RawRecord> {
        (1..=n)
            .map(|id| match json!({ "itemId": id }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_page_of_walks_all_rows() {
        let rows = rows(5);
        let first = page_of(&rows, 0, 2);
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.continuation(), Some("2"));

        let last = page_of(&rows, 4, 2);
        assert_eq!(last.records.len(), 1);
        assert!(last.continuation().is_none());
    }

    #[test]
    fn test_empty_token_ends_scan() {
        let page = ScanPage {
            records: Vec::new(),
            next_token: Some(String::new()),
        };
        assert!(page.continuation().is_none());
    }

    #[test]
    fn test_parse_offset_token() {
        assert_eq!(parse_offset_token(None).unwrap(), 0);
        assert_eq!(parse_offset_token(Some("40")).unwrap(), 40);
        assert!(parse_offset_token(Some("next")).is_err());
    }
}
