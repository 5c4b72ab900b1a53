//! Pagination
//!
//! All listings share one contract: 1-based `page`, `page_size` items per
//! page, and `total_pages = ceil(total_items / page_size)` but never below 1.

use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::models::Item;

// == Page Request ==
/// Validated pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Validates raw pagination input.
    ///
    /// `page_size` outside `1..=max_page_size` is rejected. A `page` below 1
    /// is read as page 1.
    pub fn new(page: i64, page_size: i64, max_page_size: usize) -> Result<Self> {
        if page_size < 1 {
            return Err(CatalogError::InvalidRequest(format!(
                "page_size must be at least 1, got {}",
                page_size
            )));
        }

        let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
        if page_size > max_page_size {
            return Err(CatalogError::InvalidRequest(format!(
                "page_size must be at most {}, got {}",
                max_page_size, page_size
            )));
        }

        let page = if page < 1 {
            1
        } else {
            usize::try_from(page).unwrap_or(usize::MAX)
        };

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first entry on this page.
    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

// == Page ==
/// One page of results plus the metadata needed to render pager controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Slices already-ordered entries into the requested page, cloning only
/// the entries that land on it. Out-of-range pages come back empty.
pub fn paginate<T: Clone>(ordered: &[&T], request: PageRequest) -> Page<T> {
    let total_items = ordered.len();
    let total_pages = total_items.div_ceil(request.page_size).max(1);

    let items = ordered
        .iter()
        .skip(request.offset())
        .take(request.page_size)
        .map(|entry| (*entry).clone())
        .collect();

    Page {
        items,
        total_items,
        total_pages,
        page: request.page,
        page_size: request.page_size,
    }
}

// == Collection Page ==
/// A page of one collection's items together with its display caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionPage {
    pub collection_id: u64,
    /// Collection caption, or a synthesized label for unknown collections
    pub caption: String,
    #[serde(flatten)]
    pub page: Page<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_validation() {
        assert!(matches!(
            PageRequest::new(1, 0, 100),
            Err(CatalogError::InvalidRequest(_))
        ));
        assert!(matches!(
            PageRequest::new(1, -5, 100),
            Err(CatalogError::InvalidRequest(_))
        ));
        assert!(matches!(
            PageRequest::new(1, 101, 100),
            Err(CatalogError::InvalidRequest(_))
        ));
        assert_eq!(PageRequest::new(3, 100, 100).unwrap().page(), 3);
    }

    #[test]
    fn test_page_below_one_reads_as_first_page() {
        assert_eq!(PageRequest::new(0, 10, 100).unwrap().page(), 1);
        assert_eq!(PageRequest::new(-7, 10, 100).unwrap().page(), 1);
    }

    #[test]
    fn test_paginate_slices_and_counts() {
        let values: Vec<u32> = (1..=7).collect();
        let refs: Vec<&u32> = values.iter().collect();

        let page = paginate(&refs, PageRequest::new(2, 3, 100).unwrap());
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);

        let last = paginate(&refs, PageRequest::new(3, 3, 100).unwrap());
        assert_eq!(last.items, vec![7]);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let values = [1u32, 2];
        let refs: Vec<&u32> = values.iter().collect();

        let page = paginate(&refs, PageRequest::new(9, 2, 100).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn test_paginate_empty_reports_one_page() {
        let refs: Vec<&u32> = Vec::new();
        let page = paginate(&refs, PageRequest::new(1, 10, 100).unwrap());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_collection_page_flattens_page_fields() {
        let listed = CollectionPage {
            collection_id: 10,
            caption: "Animals".to_string(),
            page: Page {
                items: Vec::new(),
                total_items: 0,
                total_pages: 1,
                page: 1,
                page_size: 24,
            },
        };
        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["caption"], "Animals");
        assert_eq!(json["total_pages"], 1);
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let values = [1u32];
        let refs: Vec<&u32> = values.iter().collect();
        let page = paginate(&refs, PageRequest::new(i64::MAX, 100, 100).unwrap());
        assert!(page.items.is_empty());
    }
}
