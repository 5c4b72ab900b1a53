//! File-backed catalog store
//!
//! Reads a JSON export of the catalog table shaped as
//! `{"items": [...], "collections": [...]}` and serves it page by page.
//! The file is read once per scan sequence (the first-page call); the
//! continuation pages of that sequence come from the parsed copy, so an edit
//! mid-scan cannot shift offsets. Edits show up on the next population.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::{EntityKind, RawRecord};
use crate::store::{page_of, parse_offset_token, CatalogStore, ScanPage};

#[derive(Debug, Default, Deserialize)]
struct CatalogExport {
    #[serde(default)]
    items: Vec<RawRecord>,
    #[serde(default)]
    collections: Vec<RawRecord>,
}

// == JSON File Store ==
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    page_limit: usize,
    /// Rows of the scan sequence currently in progress, per kind
    sequences: Mutex<HashMap<EntityKind, Arc<Vec<RawRecord>>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, page_limit: usize) -> Self {
        Self {
            path: path.into(),
            page_limit: page_limit.max(1),
            sequences: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> anyhow::Result<CatalogExport> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading catalog export {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing catalog export {}", self.path.display()))
    }

    /// Rows for `kind`: freshly read on a first-page call, otherwise the copy
    /// read when the sequence began.
    async fn rows_for(
        &self,
        kind: EntityKind,
        first_page: bool,
    ) -> anyhow::Result<Arc<Vec<RawRecord>>> {
        if !first_page {
            if let Some(rows) = self.sequences.lock().await.get(&kind) {
                return Ok(Arc::clone(rows));
            }
        }

        let export = self.load().await?;
        let rows = Arc::new(match kind {
            EntityKind::Item => export.items,
            EntityKind::Collection => export.collections,
        });
        self.sequences.lock().await.insert(kind, Arc::clone(&rows));
        Ok(rows)
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn scan(&self, kind: EntityKind, token: Option<&str>) -> anyhow::Result<ScanPage> {
        let offset = parse_offset_token(token)?;
        let rows = self.rows_for(kind, token.is_none()).await?;

        let page = page_of(&rows, offset, self.page_limit);
        if page.continuation().is_none() {
            self.sequences.lock().await.remove(&kind);
        }
        debug!(%kind, offset, returned = page.records.len(), path = %self.path.display(), "file store scan");
        Ok(page)
    }
}
