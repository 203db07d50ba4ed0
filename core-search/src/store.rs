//! Search session orchestrator
//!
//! One `SearchStore` per item kind. The store owns the accumulated [`Page`],
//! the pagination window, and an input intent stream consumed by a
//! cancellable task. All remote failures are logged and swallowed; absence
//! of results is the only user-visible symptom.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::page::Page;
use crate::pagination::PagingConfig;
use core_catalog::{CatalogClient, ItemKind, SearchQuery};
use core_recents::RecentsStore;

/// Capacity of the input intent stream; terms are tiny and consumed fast.
const INTENT_CHANNEL_CAPACITY: usize = 32;

struct StoreState {
    search_input: String,
    has_searched: bool,
    is_searching: bool,
    current_page: Page,
    paging: PagingConfig,
}

/// Stateful orchestrator for one kind's search session
pub struct SearchStore {
    kind: ItemKind,
    catalog: Arc<dyn CatalogClient>,
    recents: Arc<dyn RecentsStore>,
    recents_limit: u32,
    state: RwLock<StoreState>,
    intent: broadcast::Sender<String>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl SearchStore {
    /// Create a store for one kind.
    ///
    /// `limit`/`offset` seed the pagination window (`offset` also becomes the
    /// fixed base step); `recents_limit` caps how many persisted identifiers
    /// pre-seed the session.
    pub fn new(
        kind: ItemKind,
        catalog: Arc<dyn CatalogClient>,
        recents: Arc<dyn RecentsStore>,
        limit: u32,
        offset: u32,
        recents_limit: u32,
    ) -> Self {
        let (intent, _) = broadcast::channel(INTENT_CHANNEL_CAPACITY);
        Self {
            kind,
            catalog,
            recents,
            recents_limit,
            state: RwLock::new(StoreState {
                search_input: String::new(),
                has_searched: false,
                is_searching: false,
                current_page: Page::new(),
                paging: PagingConfig::new(limit, offset),
            }),
            intent,
            subscription: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Windowed view of the accumulated page for rendering.
    ///
    /// While the input is empty (recents browsing) the full list shows; once
    /// a term is set the view is capped at the current pagination offset.
    pub async fn displayed_page(&self) -> Page {
        let state = self.state.read().await;
        Page::display(
            &state.current_page,
            !state.search_input.is_empty(),
            state.paging.offset as usize,
        )
    }

    /// The accumulated page (merge truth, not the windowed view).
    pub async fn current_page(&self) -> Page {
        self.state.read().await.current_page.clone()
    }

    pub async fn search_input(&self) -> String {
        self.state.read().await.search_input.clone()
    }

    pub async fn has_searched(&self) -> bool {
        self.state.read().await.has_searched
    }

    pub async fn paging(&self) -> PagingConfig {
        self.state.read().await.paging
    }

    /// Pre-seed the session page with previously viewed items.
    ///
    /// Reads the persisted identifiers for this store's kind and looks them
    /// up in the catalog; failures on either side are logged and the page is
    /// left as-is.
    pub async fn load_recents(&self) {
        let ids = match self.recents.read(self.kind, self.recents_limit).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "Failed to read recent items");
                return;
            }
        };
        if ids.is_empty() {
            return;
        }

        match self.catalog.lookup(&ids, self.kind).await {
            Ok(mut batches) => {
                let batch = batches.take(self.kind);
                debug!(kind = %self.kind, count = batch.len(), "Loaded recent items");
                let mut state = self.state.write().await;
                state.current_page.merge(batch, self.kind);
            }
            Err(err) if err.is_cancelled() => {
                debug!(kind = %self.kind, "Recent items lookup cancelled");
            }
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "Recent items lookup failed");
            }
        }
    }

    /// Record the new query text and publish it on the intent stream.
    ///
    /// The consumer installed by [`observe_input`](Self::observe_input)
    /// decides whether to react; without one the publish is a no-op.
    pub async fn update_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.write().await.search_input = text.clone();
        self.intent.send(text).ok();
    }

    /// Subscribe a consumer task to the intent stream.
    ///
    /// Each non-empty published term starts a fresh search session: the page
    /// is replaced, the window resets, `has_searched` flips true. Terms
    /// arriving while a search is in flight are dropped. The subscription is
    /// cancelled by [`clean`](Self::clean); installing a new one replaces the
    /// previous task.
    pub async fn observe_input(self: Arc<Self>) {
        let mut receiver = self.intent.subscribe();
        let store = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(term) if !term.is_empty() => store.begin_search(term).await,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        debug!(missed, "Input intent stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let mut subscription = self.subscription.lock().await;
        if let Some(previous) = subscription.replace(handle) {
            previous.abort();
        }
    }

    /// Scroll-driven "load more" trigger.
    ///
    /// No-op while browsing recents (empty input) or while a search is in
    /// flight; otherwise fetches the next batch for the current term and
    /// appends it to the page.
    pub async fn on_near_bottom(&self) {
        let term = {
            let mut state = self.state.write().await;
            if state.search_input.is_empty() {
                return;
            }
            if state.is_searching {
                debug!(kind = %self.kind, "Search in flight, dropping load-more trigger");
                return;
            }
            state.is_searching = true;
            state.search_input.clone()
        };

        self.run_search(term).await;
    }

    /// Delete this kind's persisted recents and empty the current page.
    ///
    /// Terminal for the page's recents content; a fresh session must be
    /// started for recents to reappear.
    pub async fn clear_recents(&self) {
        if let Err(err) = self.recents.delete(self.kind).await {
            warn!(kind = %self.kind, error = %err, "Failed to delete recent items");
        }
        self.state.write().await.current_page.clear();
    }

    /// Teardown when the owning screen disappears.
    ///
    /// Cancels the intent subscription and resets the input state. Idempotent
    /// and infallible; the accumulated page is left for the owner to drop.
    /// Releasing the flight flag here keeps a revived store usable when the
    /// abort landed mid-search.
    pub async fn clean(&self) {
        if let Some(handle) = self.subscription.lock().await.take() {
            handle.abort();
        }

        let mut state = self.state.write().await;
        state.paging.reset();
        state.has_searched = false;
        state.is_searching = false;
        state.search_input.clear();
    }

    /// Start a fresh search session for a published term.
    async fn begin_search(&self, term: String) {
        {
            let mut state = self.state.write().await;
            if state.is_searching {
                debug!(kind = %self.kind, "Search in flight, dropping input trigger");
                return;
            }
            state.is_searching = true;
            state.has_searched = true;
            state.paging.reset();
            state.current_page = Page::new();
        }

        self.run_search(term).await;
    }

    /// One remote search under the single-flight guard; the caller must have
    /// set `is_searching`, this always clears it.
    async fn run_search(&self, term: String) {
        let query = {
            let state = self.state.read().await;
            SearchQuery::new(term, state.paging.limit, state.paging.offset, vec![self.kind])
        };

        let result = self.catalog.search(&query).await;

        let batch = match result {
            Ok(mut batches) => Some(batches.take(self.kind)),
            Err(err) if err.is_cancelled() => {
                debug!(kind = %self.kind, "Catalog search cancelled");
                None
            }
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "Catalog search failed");
                None
            }
        };

        if let Some(batch) = batch {
            if !batch.is_empty() {
                self.record_recents(&batch).await;
            }

            let mut state = self.state.write().await;
            if state.paging.should_advance(batch.len()) {
                state.paging.advance();
            }
            state.current_page.merge(batch, self.kind);
            state.is_searching = false;
        } else {
            self.state.write().await.is_searching = false;
        }
    }

    /// Persist the freshest view history for this kind (replace semantics).
    async fn record_recents(&self, batch: &[core_catalog::CatalogItem]) {
        let ids: Vec<_> = batch.iter().map(|item| item.id().clone()).collect();
        if let Err(err) = self.recents.replace(self.kind, &ids).await {
            warn!(kind = %self.kind, error = %err, "Failed to record recent items");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_catalog::{
        CatalogError, CatalogItem, ItemId, KindBatches, Result as CatalogResult, TrackSummary,
    };
    use core_recents::Result as RecentsResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Semaphore;
    use tokio::time::timeout;

    fn track(id: &str) -> CatalogItem {
        CatalogItem::Track(TrackSummary {
            id: ItemId::new(id),
            title: id.to_string(),
            artist_name: "Artist".to_string(),
            artwork: None,
        })
    }

    fn batch_of(n: usize, prefix: &str) -> Vec<CatalogItem> {
        (0..n).map(|i| track(&format!("{prefix}-{i}"))).collect()
    }

    /// Catalog double: serves scripted batches, optionally gated so a search
    /// stays in flight until released.
    struct FakeCatalog {
        search_calls: AtomicUsize,
        lookup_calls: AtomicUsize,
        batches: StdMutex<Vec<Vec<CatalogItem>>>,
        gate: Option<Semaphore>,
        fail: bool,
    }

    impl FakeCatalog {
        fn with_batches(batches: Vec<Vec<CatalogItem>>) -> Arc<Self> {
            Arc::new(Self {
                search_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
                batches: StdMutex::new(batches),
                gate: None,
                fail: false,
            })
        }

        fn gated(batches: Vec<Vec<CatalogItem>>) -> Arc<Self> {
            Arc::new(Self {
                search_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
                batches: StdMutex::new(batches),
                gate: Some(Semaphore::new(0)),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                search_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
                batches: StdMutex::new(Vec::new()),
                gate: None,
                fail: true,
            })
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(16);
            }
        }

        fn next_batch(&self) -> Vec<CatalogItem> {
            let mut batches = self.batches.lock().unwrap();
            if batches.is_empty() {
                Vec::new()
            } else {
                batches.remove(0)
            }
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn search(&self, query: &SearchQuery) -> CatalogResult<KindBatches> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
            if self.fail {
                return Err(CatalogError::Api {
                    status_code: 503,
                    message: "unavailable".to_string(),
                });
            }
            let mut batches = KindBatches::new();
            batches.set(query.kinds[0], self.next_batch());
            Ok(batches)
        }

        async fn lookup(&self, ids: &[ItemId], kind: ItemKind) -> CatalogResult<KindBatches> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            let mut batches = KindBatches::new();
            batches.set(kind, ids.iter().map(|id| track(id.as_str())).collect());
            Ok(batches)
        }
    }

    /// Recents double backed by a plain map of kind → ids.
    #[derive(Default)]
    struct FakeRecents {
        entries: StdMutex<Vec<(ItemKind, Vec<ItemId>)>>,
    }

    impl FakeRecents {
        fn with(kind: ItemKind, ids: Vec<ItemId>) -> Arc<Self> {
            let store = Self::default();
            store.entries.lock().unwrap().push((kind, ids));
            Arc::new(store)
        }

        fn get(&self, kind: ItemKind) -> Vec<ItemId> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, ids)| ids.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl RecentsStore for FakeRecents {
        async fn read(&self, kind: ItemKind, limit: u32) -> RecentsResult<Vec<ItemId>> {
            let mut ids = self.get(kind);
            ids.truncate(limit as usize);
            Ok(ids)
        }

        async fn replace(&self, kind: ItemKind, ids: &[ItemId]) -> RecentsResult<()> {
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|(k, _)| *k != kind);
            entries.push((kind, ids.to_vec()));
            Ok(())
        }

        async fn delete(&self, kind: ItemKind) -> RecentsResult<()> {
            self.entries.lock().unwrap().retain(|(k, _)| *k != kind);
            Ok(())
        }
    }

    fn store_with(
        catalog: Arc<FakeCatalog>,
        recents: Arc<FakeRecents>,
    ) -> Arc<SearchStore> {
        Arc::new(SearchStore::new(
            ItemKind::Track,
            catalog,
            recents,
            25,
            25,
            10,
        ))
    }

    async fn wait_until<F, Fut>(mut condition: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        timeout(Duration::from_secs(5), async {
            while !condition().await {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_on_near_bottom_is_single_flight() {
        let catalog = FakeCatalog::gated(vec![batch_of(3, "a"), batch_of(3, "b")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        store.update_input("abba").await;

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.on_near_bottom().await }
        });

        // Wait until the first call holds the flight flag, then trigger again.
        wait_until(|| {
            let catalog = Arc::clone(&catalog);
            async move { catalog.search_calls.load(Ordering::SeqCst) == 1 }
        })
        .await;
        store.on_near_bottom().await;

        catalog.release();
        first.await.unwrap();

        assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.current_page().await.ids(ItemKind::Track).len(), 3);
    }

    #[tokio::test]
    async fn test_on_near_bottom_ignores_empty_input() {
        let catalog = FakeCatalog::with_batches(vec![batch_of(3, "a")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        store.on_near_bottom().await;
        assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_near_full_batch_advances_offset() {
        let catalog = FakeCatalog::with_batches(vec![batch_of(24, "a"), batch_of(10, "b")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        store.update_input("abba").await;

        // 24 ≥ base_offset - 1: window grows 25 → 50.
        store.on_near_bottom().await;
        assert_eq!(store.paging().await.offset, 50);

        // 10 < base_offset - 1: window stays.
        store.on_near_bottom().await;
        assert_eq!(store.paging().await.offset, 50);
        assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_failure_is_swallowed_and_clears_flight_flag() {
        let catalog = FakeCatalog::failing();
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        store.update_input("abba").await;
        store.on_near_bottom().await;
        store.on_near_bottom().await;

        // Both triggers reached the catalog: the guard was released after the
        // failure, and the page is unchanged.
        assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 2);
        assert!(store.current_page().await.ids(ItemKind::Track).is_empty());
    }

    #[tokio::test]
    async fn test_input_intent_starts_fresh_session() {
        let catalog = FakeCatalog::with_batches(vec![batch_of(2, "a")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        Arc::clone(&store).observe_input().await;
        assert!(!store.has_searched().await);

        store.update_input("abba").await;

        wait_until(|| {
            let store = Arc::clone(&store);
            async move { store.current_page().await.ids(ItemKind::Track).len() == 2 }
        })
        .await;

        assert!(store.has_searched().await);
        // Small batch: the window never advanced past the reset.
        assert_eq!(store.paging().await.offset, 0);

        store.clean().await;
    }

    #[tokio::test]
    async fn test_empty_input_is_filtered() {
        let catalog = FakeCatalog::with_batches(vec![batch_of(2, "a")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        Arc::clone(&store).observe_input().await;
        store.update_input("").await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert!(!store.has_searched().await);
        assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);

        store.clean().await;
    }

    #[tokio::test]
    async fn test_clean_then_input_restarts_session() {
        let catalog = FakeCatalog::with_batches(vec![batch_of(2, "a"), batch_of(2, "b")]);
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        Arc::clone(&store).observe_input().await;
        store.update_input("abba").await;
        wait_until(|| {
            let catalog = Arc::clone(&catalog);
            async move { catalog.search_calls.load(Ordering::SeqCst) == 1 }
        })
        .await;

        store.clean().await;
        assert!(!store.has_searched().await);
        assert!(store.search_input().await.is_empty());
        assert_eq!(store.paging().await.offset, 0);

        // Idempotent.
        store.clean().await;

        // A new subscription revives the store.
        Arc::clone(&store).observe_input().await;
        store.update_input("x").await;
        wait_until(|| {
            let store = Arc::clone(&store);
            async move { store.has_searched().await }
        })
        .await;
        assert_eq!(store.paging().await.offset, 0);

        store.clean().await;
    }

    #[tokio::test]
    async fn test_load_recents_seeds_page() {
        let recents = FakeRecents::with(
            ItemKind::Track,
            vec![ItemId::new("r1"), ItemId::new("r2")],
        );
        let catalog = FakeCatalog::with_batches(Vec::new());
        let store = store_with(Arc::clone(&catalog), Arc::clone(&recents));

        store.load_recents().await;

        let page = store.current_page().await;
        assert_eq!(
            page.ids(ItemKind::Track),
            vec![ItemId::new("r1"), ItemId::new("r2")]
        );
        assert_eq!(catalog.lookup_calls.load(Ordering::SeqCst), 1);

        // Recents browsing shows the full list regardless of the window.
        let displayed = store.displayed_page().await;
        assert_eq!(displayed.ids(ItemKind::Track).len(), 2);
    }

    #[tokio::test]
    async fn test_load_recents_with_no_ids_skips_lookup() {
        let catalog = FakeCatalog::with_batches(Vec::new());
        let store = store_with(Arc::clone(&catalog), Arc::new(FakeRecents::default()));

        store.load_recents().await;
        assert_eq!(catalog.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_records_recents() {
        let recents = Arc::new(FakeRecents::default());
        let catalog = FakeCatalog::with_batches(vec![batch_of(2, "a")]);
        let store = store_with(Arc::clone(&catalog), Arc::clone(&recents));

        store.update_input("abba").await;
        store.on_near_bottom().await;

        assert_eq!(
            recents.get(ItemKind::Track),
            vec![ItemId::new("a-0"), ItemId::new("a-1")]
        );
    }

    #[tokio::test]
    async fn test_clear_recents_deletes_and_empties_page() {
        let recents = FakeRecents::with(ItemKind::Track, vec![ItemId::new("r1")]);
        let catalog = FakeCatalog::with_batches(Vec::new());
        let store = store_with(Arc::clone(&catalog), Arc::clone(&recents));

        store.load_recents().await;
        store.clear_recents().await;

        assert!(recents.get(ItemKind::Track).is_empty());
        assert_eq!(store.current_page().await.count(), 0);
    }
}
