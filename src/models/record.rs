//! Raw record normalization
//!
//! The backing store hands back untyped attribute maps. Everything the cache
//! keeps goes through here first; a record that cannot yield a positive
//! identifier is dropped.

use serde_json::{Map, Value};

use crate::models::{Collection, EntityKind, Item, UrlTemplates};

/// Untyped attribute map as returned by a store scan.
pub type RawRecord = Map<String, Value>;

// == Attribute Names ==
pub const ATTR_ENTITY_TYPE: &str = "entityType";
pub const ATTR_ITEM_ID: &str = "itemId";
pub const ATTR_COLLECTION_ID: &str = "collectionId";
pub const ATTR_CAPTION: &str = "caption";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_NOTES: &str = "notes";
pub const ATTR_TEXT: &str = "text";
pub const ATTR_WIDTH: &str = "width";
pub const ATTR_HEIGHT: &str = "height";
pub const ATTR_COLOR_COUNT: &str = "colorCount";
pub const ATTR_DOWNLOAD_COUNT: &str = "downloadCount";
pub const ATTR_PAGE_WITHIN_COLLECTION: &str = "pageWithinCollection";
pub const ATTR_GLOBAL_PAGE_ORDINAL: &str = "globalPageOrdinal";
pub const ATTR_IMAGE_URL: &str = "imageUrl";
pub const ATTR_DOWNLOAD_URL: &str = "downloadUrl";

// == Item Mapping ==
/// Maps a raw item row. Returns `None` for rows without a positive
/// `itemId` or `collectionId`, or rows tagged as another kind.
pub fn item_from_record(record: &RawRecord, urls: &UrlTemplates) -> Option<Item> {
    if !kind_matches(record, EntityKind::Item) {
        return None;
    }

    let item_id = positive_id(record, ATTR_ITEM_ID)?;
    let collection_id = positive_id(record, ATTR_COLLECTION_ID)?;

    let image_url = string_attr(record, ATTR_IMAGE_URL)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| urls.image_url(collection_id, item_id));
    let download_url = string_attr(record, ATTR_DOWNLOAD_URL)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| urls.download_url(collection_id, item_id));

    Some(Item {
        item_id,
        collection_id,
        caption: string_attr(record, ATTR_CAPTION).unwrap_or_default(),
        description: string_attr(record, ATTR_DESCRIPTION).unwrap_or_default(),
        notes: string_attr(record, ATTR_NOTES).unwrap_or_default(),
        text: string_attr(record, ATTR_TEXT).unwrap_or_default(),
        width: u32_attr(record, ATTR_WIDTH),
        height: u32_attr(record, ATTR_HEIGHT),
        color_count: u32_attr(record, ATTR_COLOR_COUNT),
        download_count: u64_attr(record, ATTR_DOWNLOAD_COUNT).unwrap_or(0),
        page_within_collection: u64_attr(record, ATTR_PAGE_WITHIN_COLLECTION).unwrap_or(0),
        global_page_ordinal: u64_attr(record, ATTR_GLOBAL_PAGE_ORDINAL).unwrap_or(0),
        image_url,
        download_url,
    })
}

// == Collection Mapping ==
/// Maps a raw collection row. Returns `None` without a positive `collectionId`.
pub fn collection_from_record(record: &RawRecord) -> Option<Collection> {
    if !kind_matches(record, EntityKind::Collection) {
        return None;
    }

    Some(Collection {
        collection_id: positive_id(record, ATTR_COLLECTION_ID)?,
        caption: string_attr(record, ATTR_CAPTION).unwrap_or_default(),
    })
}

// == Coercion Helpers ==

/// Rows without a discriminator are trusted to be of the scanned kind.
fn kind_matches(record: &RawRecord, kind: EntityKind) -> bool {
    match record.get(ATTR_ENTITY_TYPE).and_then(Value::as_str) {
        Some(tag) => tag.trim().eq_ignore_ascii_case(kind.as_str()),
        None => true,
    }
}

fn positive_id(record: &RawRecord, name: &str) -> Option<u64> {
    u64_attr(record, name).filter(|id| *id > 0)
}

/// Numbers may arrive as JSON numbers or as numeric strings.
fn u64_attr(record: &RawRecord, name: &str) -> Option<u64> {
    match record.get(name)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn u32_attr(record: &RawRecord, name: &str) -> u32 {
    u64_attr(record, name)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn string_attr(record: &RawRecord, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_item_full_mapping() {
        let raw = record(json!({
            "itemId": 7,
            "collectionId": 3,
            "caption": "Fox",
            "description": "A red fox",
            "notes": "Use DMC",
            "text": "fox forest",
            "width": 120,
            "height": 90,
            "colorCount": 14,
            "downloadCount": 52,
            "pageWithinCollection": 2,
            "globalPageOrdinal": 31,
        }));

        let item = item_from_record(&raw, &UrlTemplates::new("https://i", "https://d")).unwrap();
        assert_eq!(item.item_id, 7);
        assert_eq!(item.collection_id, 3);
        assert_eq!(item.caption, "Fox");
        assert_eq!(item.width, 120);
        assert_eq!(item.height, 90);
        assert_eq!(item.color_count, 14);
        assert_eq!(item.download_count, 52);
        assert_eq!(item.page_within_collection, 2);
        assert_eq!(item.global_page_ordinal, 31);
        assert_eq!(item.image_url, "https://i/3/7.jpg");
        assert_eq!(item.download_url, "https://d/3/7.pdf");
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let raw = record(json!({
            "itemId": "12",
            "collectionId": " 4 ",
            "width": "80",
            "colorCount": 9.0,
        }));

        let item = item_from_record(&raw, &UrlTemplates::default()).unwrap();
        assert_eq!(item.item_id, 12);
        assert_eq!(item.collection_id, 4);
        assert_eq!(item.width, 80);
        assert_eq!(item.color_count, 9);
        assert_eq!(item.height, 0);
        assert_eq!(item.caption, "");
    }

    #[test]
    fn test_stored_urls_win_over_template() {
        let raw = record(json!({
            "itemId": 1,
            "collectionId": 1,
            "imageUrl": "https://cdn/custom.png",
            "downloadUrl": "",
        }));

        let urls = UrlTemplates::new("https://i", "https://d");
        let item = item_from_record(&raw, &urls).unwrap();
        assert_eq!(item.image_url, "https://cdn/custom.png");
        assert_eq!(item.download_url, "https://d/1/1.pdf");
    }

    #[test]
    fn test_malformed_identifiers_are_dropped() {
        let urls = UrlTemplates::default();
        for raw in [
            json!({ "collectionId": 1 }),
            json!({ "itemId": 0, "collectionId": 1 }),
            json!({ "itemId": -3, "collectionId": 1 }),
            json!({ "itemId": "abc", "collectionId": 1 }),
            json!({ "itemId": 1.5, "collectionId": 1 }),
            json!({ "itemId": 1 }),
        ] {
            assert!(item_from_record(&record(raw), &urls).is_none());
        }

        assert!(collection_from_record(&record(json!({ "caption": "x" }))).is_none());
        assert!(collection_from_record(&record(json!({ "collectionId": 0 }))).is_none());
    }

    #[test]
    fn test_mismatched_discriminator_is_dropped() {
        let raw = record(json!({ "entityType": "collection", "itemId": 1, "collectionId": 1 }));
        assert!(item_from_record(&raw, &UrlTemplates::default()).is_none());

        let raw = record(json!({ "entityType": "Collection", "collectionId": 5, "caption": "Birds" }));
        let collection = collection_from_record(&raw).unwrap();
        assert_eq!(collection.collection_id, 5);
        assert_eq!(collection.caption, "Birds");
    }

    #[test]
    fn test_oversized_dimension_defaults_to_zero() {
        let raw = record(json!({ "itemId": 1, "collectionId": 1, "width": 5_000_000_000u64 }));
        let item = item_from_record(&raw, &UrlTemplates::default()).unwrap();
        assert_eq!(item.width, 0);
    }
}
