//! Catalog entities and API DTOs
//!
//! Entities are what the cache stores; requests/responses are the
//! serialized shapes of the HTTP surface.

pub mod entity;
pub mod record;
pub mod requests;
pub mod responses;
pub mod urls;

// Re-export commonly used types
pub use entity::{Collection, EntityKind, Item};
pub use record::{collection_from_record, item_from_record, RawRecord};
pub use requests::{CaptionQuery, ListQuery, SearchQuery};
pub use responses::{
    CollectionResponse, CollectionSummary, CollectionsResponse, HealthResponse,
    InvalidateResponse, StatsResponse,
};
pub use urls::UrlTemplates;
