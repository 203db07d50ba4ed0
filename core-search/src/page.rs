//! Per-session accumulated result page
//!
//! A `Page` holds one ordered cell list per kind. Lists start with a single
//! sentinel cell (the recents header) and grow by deduplicated merges; the
//! displayed view is a windowed prefix computed without mutating the
//! accumulated truth.

use std::collections::HashSet;
use uuid::Uuid;

use core_catalog::{CatalogItem, ItemId, ItemKind};

/// One entry in a kind's cell list
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A catalog item
    Item(CatalogItem),
    /// The leading "recents header" sentinel; not a catalog item
    RecentsHeader(Uuid),
}

impl Cell {
    /// The contained item, if this cell is not the sentinel
    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            Cell::Item(item) => Some(item),
            Cell::RecentsHeader(_) => None,
        }
    }

    /// Identity for list diffing; sentinel cells use their own uuid
    pub fn id(&self) -> ItemId {
        match self {
            Cell::Item(item) => item.id().clone(),
            Cell::RecentsHeader(id) => ItemId::new(id.to_string()),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Cell::RecentsHeader(_))
    }
}

/// Accumulated, deduplicated result set for one search session
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    tracks: Vec<Cell>,
    people: Vec<Cell>,
    collections: Vec<Cell>,
}

impl Page {
    /// Fresh page: every kind's list holds only the recents header sentinel.
    pub fn new() -> Self {
        Self {
            tracks: vec![Cell::RecentsHeader(Uuid::new_v4())],
            people: vec![Cell::RecentsHeader(Uuid::new_v4())],
            collections: vec![Cell::RecentsHeader(Uuid::new_v4())],
        }
    }

    pub fn cells(&self, kind: ItemKind) -> &[Cell] {
        match kind {
            ItemKind::Track => &self.tracks,
            ItemKind::Person => &self.people,
            ItemKind::Collection => &self.collections,
        }
    }

    fn cells_mut(&mut self, kind: ItemKind) -> &mut Vec<Cell> {
        match kind {
            ItemKind::Track => &mut self.tracks,
            ItemKind::Person => &mut self.people,
            ItemKind::Collection => &mut self.collections,
        }
    }

    /// Total cell count across all kinds (sentinels included)
    pub fn count(&self) -> usize {
        self.tracks.len() + self.people.len() + self.collections.len()
    }

    /// Non-sentinel identifiers of one kind's list, in order
    pub fn ids(&self, kind: ItemKind) -> Vec<ItemId> {
        self.cells(kind)
            .iter()
            .filter_map(|cell| cell.item())
            .map(|item| item.id().clone())
            .collect()
    }

    /// Append a batch to one kind's list, dropping identifiers already
    /// present among the kind's non-sentinel cells. Pre-existing order is
    /// preserved; survivors keep the batch's order. An empty batch is a
    /// no-op.
    pub fn merge(&mut self, batch: Vec<CatalogItem>, kind: ItemKind) {
        if batch.is_empty() {
            return;
        }

        let cells = self.cells_mut(kind);
        let existing: HashSet<ItemId> = cells
            .iter()
            .filter_map(|cell| cell.item())
            .map(|item| item.id().clone())
            .collect();

        cells.extend(
            batch
                .into_iter()
                .filter(|item| !existing.contains(item.id()))
                .map(Cell::Item),
        );
    }

    /// Windowed copy for display; never mutates `source`.
    ///
    /// The kind whose list holds more than one cell is the one actively being
    /// searched (one kind per store by construction). Its list is truncated
    /// to the first `min(window, len)` cells, but only when `can_grow` is
    /// true and the truncation is non-empty. While the user is still
    /// browsing recents (`can_grow` false) the full list shows regardless of
    /// window size.
    pub fn display(source: &Page, can_grow: bool, window: usize) -> Page {
        let mut copy = source.clone();
        let kind = source.active_kind();

        let cells = copy.cells_mut(kind);
        let max = window.min(cells.len());
        if can_grow && max > 0 {
            cells.truncate(max);
        }

        copy
    }

    /// Reset all kind lists to empty. Sentinels are not re-inserted; a fresh
    /// page must be constructed for recents to reappear.
    pub fn clear(&mut self) {
        self.tracks = Vec::new();
        self.people = Vec::new();
        self.collections = Vec::new();
    }

    /// The kind currently accumulating results, falling back to Collection
    /// when every list is still sentinel-only.
    fn active_kind(&self) -> ItemKind {
        if self.tracks.len() > 1 {
            ItemKind::Track
        } else if self.people.len() > 1 {
            ItemKind::Person
        } else {
            ItemKind::Collection
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
