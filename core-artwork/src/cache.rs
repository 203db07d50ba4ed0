//! LRU artwork cache bounded by total byte cost

use bytes::Bytes;
use lru::LruCache;
use std::fmt;
use tracing::debug;

/// Decoded artwork ready for display
#[derive(Clone, PartialEq, Eq)]
pub struct ArtworkImage {
    /// Encoded image payload as fetched
    pub bytes: Bytes,
    /// Decoded pixel width
    pub width: u32,
    /// Decoded pixel height
    pub height: u32,
}

impl ArtworkImage {
    /// Byte cost charged against the cache budget
    pub fn cost(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for ArtworkImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Cache for fetched artwork, keyed by resolved URL
///
/// Capacity is limited by total byte cost, not item count. Inserting evicts
/// least-recently-used entries until the new entry fits; an entry larger than
/// the whole budget is not cached at all.
pub struct ArtworkCache {
    entries: LruCache<String, ArtworkImage>,
    budget_bytes: usize,
    used_bytes: usize,
}

impl ArtworkCache {
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            budget_bytes,
            used_bytes: 0,
        }
    }

    /// Look up artwork by URL, marking the entry as recently used
    pub fn get(&mut self, url: &str) -> Option<ArtworkImage> {
        self.entries.get(url).cloned()
    }

    /// Insert artwork, evicting LRU entries until the budget holds it
    pub fn insert(&mut self, url: String, image: ArtworkImage) {
        let cost = image.cost();
        if cost > self.budget_bytes {
            debug!(url = %url, cost, budget = self.budget_bytes, "Artwork exceeds cache budget, not cached");
            return;
        }

        if let Some(previous) = self.entries.pop(&url) {
            self.used_bytes -= previous.cost();
        }

        while self.used_bytes + cost > self.budget_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.used_bytes -= evicted.cost();
                    debug!(evicted_cost = evicted.cost(), "Evicted artwork from cache");
                }
                None => break,
            }
        }

        self.used_bytes += cost;
        self.entries.put(url, image);
    }

    /// Current (item count, total bytes)
    pub fn stats(&self) -> (usize, usize) {
        (self.entries.len(), self.used_bytes)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }
}
