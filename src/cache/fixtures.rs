//! Shared test fixtures for the cache module.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::models::{Collection, Item, RawRecord, UrlTemplates};

/// Item with neutral dimensions; tests override fields as needed.
pub fn item(item_id: u64, collection_id: u64, global_ordinal: u64, page: u64) -> Item {
    let urls = UrlTemplates::default();
    Item {
        item_id,
        collection_id,
        caption: format!("Item {}", item_id),
        description: String::new(),
        notes: String::new(),
        text: String::new(),
        width: 100,
        height: 100,
        color_count: 10,
        download_count: 0,
        page_within_collection: page,
        global_page_ordinal: global_ordinal,
        image_url: urls.image_url(collection_id, item_id),
        download_url: urls.download_url(collection_id, item_id),
    }
}

pub fn collection(collection_id: u64, caption: &str) -> Collection {
    Collection {
        collection_id,
        caption: caption.to_string(),
    }
}

pub fn item_map(items: Vec<Item>) -> HashMap<u64, Item> {
    items.into_iter().map(|item| (item.item_id, item)).collect()
}

pub fn collection_map(collections: Vec<Collection>) -> HashMap<u64, Collection> {
    collections
        .into_iter()
        .map(|collection| (collection.collection_id, collection))
        .collect()
}

fn object(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be a JSON object"),
    }
}

pub fn item_row(item_id: u64, collection_id: u64, global_ordinal: u64, page: u64) -> RawRecord {
    object(json!({
        "entityType": "item",
        "itemId": item_id,
        "collectionId": collection_id,
        "caption": format!("Item {}", item_id),
        "width": 100,
        "height": 100,
        "colorCount": 10,
        "pageWithinCollection": page,
        "globalPageOrdinal": global_ordinal,
    }))
}

pub fn collection_row(collection_id: u64, caption: &str) -> RawRecord {
    object(json!({
        "entityType": "collection",
        "collectionId": collection_id,
        "caption": caption,
    }))
}

/// Rows of the three-item, two-collection catalog used across the tests.
pub fn sample_rows() -> (Vec<RawRecord>, Vec<RawRecord>) {
    (
        vec![item_row(1, 10, 1, 1), item_row(2, 10, 2, 2), item_row(3, 20, 3, 1)],
        vec![collection_row(10, "Animals"), collection_row(20, "Florals")],
    )
}
