//! Catalog entities
//!
//! Typed shapes of the two entity kinds mirrored by the cache.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Entity Kind ==
/// Type discriminator of a backing-table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Collection,
}

impl EntityKind {
    /// Value of the `entityType` attribute for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Item => "item",
            EntityKind::Collection => "collection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Item ==
/// A downloadable pattern design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub item_id: u64,
    /// Owning collection
    pub collection_id: u64,
    pub caption: String,
    pub description: String,
    pub notes: String,
    pub text: String,
    /// Stitch columns
    pub width: u32,
    /// Stitch rows
    pub height: u32,
    /// Palette size
    pub color_count: u32,
    pub download_count: u64,
    /// 1-based position inside the owning collection
    pub page_within_collection: u64,
    /// 1-based position across the whole catalog
    pub global_page_ordinal: u64,
    pub image_url: String,
    pub download_url: String,
}

// == Collection ==
/// A themed grouping of items (an album).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub collection_id: u64,
    /// Display name, also the exact-match lookup key
    pub caption: String,
}

impl Collection {
    /// Label shown when an item points at a collection the cache does not know.
    pub fn fallback_caption(collection_id: u64) -> String {
        format!("Collection {}", collection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_discriminator() {
        assert_eq!(EntityKind::Item.as_str(), "item");
        assert_eq!(EntityKind::Collection.to_string(), "collection");
    }

    #[test]
    fn test_fallback_caption() {
        assert_eq!(Collection::fallback_caption(42), "Collection 42");
    }
}
