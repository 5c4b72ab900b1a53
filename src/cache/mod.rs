//! Cache Module
//!
//! In-memory read-through mirror of the catalog's items and collections,
//! with single-flight population and in-memory pagination.

mod catalog;
mod filter;
mod loader;
mod ordinals;
mod page;
mod snapshot;
mod stats;

#[cfg(test)]
mod fixtures;

// Re-export public types
pub use catalog::CatalogCache;
pub use filter::ItemFilter;
pub use ordinals::{validate_ordinals, OrdinalReport};
pub use page::{paginate, CollectionPage, Page, PageRequest};
pub use snapshot::CatalogSnapshot;
pub use stats::{CachePhase, CacheStats};

// == Public Constants ==
/// Largest page size accepted unless configured otherwise
pub const DEFAULT_MAX_PAGE_SIZE: usize = 200;
