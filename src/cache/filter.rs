//! Attribute-range and free-text filter for item listings.

use crate::models::Item;

// == Item Filter ==
/// Inclusive range bounds on dimensions and palette size, plus an optional
/// case-insensitive caption match. Absent bounds are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub width_from: Option<u32>,
    pub width_to: Option<u32>,
    pub height_from: Option<u32>,
    pub height_to: Option<u32>,
    pub colors_from: Option<u32>,
    pub colors_to: Option<u32>,
    /// Matched as a substring of the item caption or of its collection caption
    pub text: Option<String>,
}

impl ItemFilter {
    /// Prepares the filter for repeated matching.
    pub(crate) fn predicate(&self) -> FilterPredicate<'_> {
        let needle = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        FilterPredicate {
            filter: self,
            needle,
        }
    }
}

pub(crate) struct FilterPredicate<'a> {
    filter: &'a ItemFilter,
    needle: Option<String>,
}

impl FilterPredicate<'_> {
    /// `collection_caption` is the caption of the item's owning collection,
    /// if the cache knows it.
    pub(crate) fn matches(&self, item: &Item, collection_caption: Option<&str>) -> bool {
        let f = self.filter;
        if !in_range(item.width, f.width_from, f.width_to)
            || !in_range(item.height, f.height_from, f.height_to)
            || !in_range(item.color_count, f.colors_from, f.colors_to)
        {
            return false;
        }

        match &self.needle {
            None => true,
            Some(needle) => {
                item.caption.to_lowercase().contains(needle.as_str())
                    || collection_caption
                        .is_some_and(|caption| caption.to_lowercase().contains(needle.as_str()))
            }
        }
    }
}

fn in_range(value: u32, from: Option<u32>, to: Option<u32>) -> bool {
    from.map_or(true, |lo| value >= lo) && to.map_or(true, |hi| value <= hi)
}
