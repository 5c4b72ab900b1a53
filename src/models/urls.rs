//! Derived asset URLs
//!
//! Preview image and PDF download links are a pure function of
//! `(collection_id, item_id)` and the configured base URLs.

use crate::config::Config;

/// Base URLs the derived links are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    image_base: String,
    download_base: String,
}

impl UrlTemplates {
    /// Creates templates from two base URLs. Trailing slashes are dropped.
    pub fn new(image_base: impl Into<String>, download_base: impl Into<String>) -> Self {
        Self {
            image_base: trim_base(image_base.into()),
            download_base: trim_base(download_base.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.image_base_url.clone(), config.download_base_url.clone())
    }

    /// `{image_base}/{collection_id}/{item_id}.jpg`
    pub fn image_url(&self, collection_id: u64, item_id: u64) -> String {
        format!("{}/{}/{}.jpg", self.image_base, collection_id, item_id)
    }

    /// `{download_base}/{collection_id}/{item_id}.pdf`
    pub fn download_url(&self, collection_id: u64, item_id: u64) -> String {
        format!("{}/{}/{}.pdf", self.download_base, collection_id, item_id)
    }
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
