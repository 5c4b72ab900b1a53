//! Request DTOs for the catalog API
//!
//! Query-string shapes accepted by the listing and lookup endpoints.

use serde::Deserialize;

use crate::cache::ItemFilter;

/// Query string of the paginated listings (`?page=&page_size=`).
///
/// Signed so that nonsense like `page=-1` reaches pagination validation
/// instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub width_from: Option<u32>,
    #[serde(default)]
    pub width_to: Option<u32>,
    #[serde(default)]
    pub height_from: Option<u32>,
    #[serde(default)]
    pub height_to: Option<u32>,
    #[serde(default)]
    pub colors_from: Option<u32>,
    #[serde(default)]
    pub colors_to: Option<u32>,
    /// Case-insensitive match against item or collection caption
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl SearchQuery {
    /// Splits the query into its filter and pagination halves.
    pub fn into_parts(self) -> (ItemFilter, ListQuery) {
        let filter = ItemFilter {
            width_from: self.width_from,
            width_to: self.width_to,
            height_from: self.height_from,
            height_to: self.height_to,
            colors_from: self.colors_from,
            colors_to: self.colors_to,
            text: self.text,
        };
        let paging = ListQuery {
            page: self.page,
            page_size: self.page_size,
        };
        (filter, paging)
    }
}

/// Query string of `GET /lookup/collection`.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionQuery {
    pub caption: String,
}
