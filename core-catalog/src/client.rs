//! Remote catalog client seam
//!
//! Search and lookup both return [`KindBatches`]: one ordered result batch
//! per item kind, empty for kinds the request did not cover.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CatalogItem, ItemId, ItemKind};

/// Parameters of one remote search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// User-entered search term
    pub term: String,
    /// Maximum batch size per kind
    pub limit: u32,
    /// Pagination offset into the upstream result set
    pub offset: u32,
    /// Kinds the caller wants results for
    pub kinds: Vec<ItemKind>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, limit: u32, offset: u32, kinds: Vec<ItemKind>) -> Self {
        Self {
            term: term.into(),
            limit,
            offset,
            kinds,
        }
    }
}

/// Per-kind ordered result batches from one search or lookup call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindBatches {
    tracks: Vec<CatalogItem>,
    people: Vec<CatalogItem>,
    collections: Vec<CatalogItem>,
}

impl KindBatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self, kind: ItemKind) -> &[CatalogItem] {
        match kind {
            ItemKind::Track => &self.tracks,
            ItemKind::Person => &self.people,
            ItemKind::Collection => &self.collections,
        }
    }

    pub fn set(&mut self, kind: ItemKind, items: Vec<CatalogItem>) {
        match kind {
            ItemKind::Track => self.tracks = items,
            ItemKind::Person => self.people = items,
            ItemKind::Collection => self.collections = items,
        }
    }

    /// Take ownership of one kind's batch, leaving it empty
    pub fn take(&mut self, kind: ItemKind) -> Vec<CatalogItem> {
        match kind {
            ItemKind::Track => std::mem::take(&mut self.tracks),
            ItemKind::Person => std::mem::take(&mut self.people),
            ItemKind::Collection => std::mem::take(&mut self.collections),
        }
    }

    /// The first kind holding a non-empty batch
    ///
    /// When a request covered a single kind (the common case: one store per
    /// kind), this is the kind the response populated.
    pub fn populated_kind(&self) -> Option<ItemKind> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| !self.batch(*kind).is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.people.is_empty() && self.collections.is_empty()
    }

    /// Total item count across all kinds
    pub fn len(&self) -> usize {
        self.tracks.len() + self.people.len() + self.collections.len()
    }
}

/// Async client for the remote catalog service
///
/// Providers implement this; the search core consumes it. Transient failures
/// are recoverable errors; the caller owns the swallow/log policy.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog by term, returning one batch per requested kind.
    async fn search(&self, query: &SearchQuery) -> Result<KindBatches>;

    /// Fetch catalog items by identifier set, one kind per call.
    ///
    /// The returned batch preserves the catalog's response order.
    async fn lookup(&self, ids: &[ItemId], kind: ItemKind) -> Result<KindBatches>;
}
