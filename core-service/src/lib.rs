//! Core service façade and bootstrap helpers.
//!
//! This crate wires the catalog provider, recents store, artwork pipeline
//! and search stores into one handle a host application can own. Hosts that
//! want full control construct [`CoreDependencies`] themselves; the
//! [`bootstrap`] helper builds the production wiring (reqwest transport,
//! SQLite recents, Apple Music provider) from a [`CoreConfig`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;
use tracing::info;

use bridge_http::{HttpClient, ReqwestHttpClient};
use core_artwork::{ArtworkFetcher, ArtworkImage};
use core_catalog::{CatalogClient, CatalogItem, ItemKind};
use core_recents::{create_pool, DbConfig, RecentsStore, SqliteRecentsStore};
use core_runtime::CoreConfig;
use core_search::SearchStore;
use provider_applemusic::AppleMusicConnector;

/// Aggregated handle to the collaborators the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub catalog: Arc<dyn CatalogClient>,
    pub recents: Arc<dyn RecentsStore>,
    pub artwork: Arc<ArtworkFetcher>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        catalog: Arc<dyn CatalogClient>,
        recents: Arc<dyn RecentsStore>,
        artwork: Arc<ArtworkFetcher>,
    ) -> Self {
        Self {
            http_client,
            catalog,
            recents,
            artwork,
        }
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CatalogService {
    config: CoreConfig,
    deps: Arc<CoreDependencies>,
}

impl CatalogService {
    /// Create a new service from validated configuration and dependencies.
    pub fn new(config: CoreConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            deps: Arc::new(deps),
        })
    }

    /// Access the dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// The shared artwork fetcher.
    pub fn artwork(&self) -> Arc<ArtworkFetcher> {
        Arc::clone(&self.deps.artwork)
    }

    /// Fetch an item's artwork at the configured display size.
    ///
    /// Resolves the item's artwork URL template and goes through the shared
    /// single-flight pipeline; `None` when the item carries no artwork or the
    /// fetch fails.
    pub async fn fetch_artwork(&self, item: &CatalogItem) -> Option<ArtworkImage> {
        let url = item
            .artwork()
            .map(|artwork| artwork.url(self.config.artwork.default_size_px));
        self.deps.artwork.fetch(url.as_deref()).await
    }

    /// Construct a search store for one kind, wired to the shared catalog
    /// client and recents store with the configured pagination values.
    /// Screens own their stores; stores for different kinds are independent.
    pub fn search_store(&self, kind: ItemKind) -> Arc<SearchStore> {
        Arc::new(SearchStore::new(
            kind,
            Arc::clone(&self.deps.catalog),
            Arc::clone(&self.deps.recents),
            self.config.search.page_limit,
            self.config.search.page_offset,
            self.config.search.recents_limit,
        ))
    }
}

/// Build the production wiring from configuration.
///
/// Opens (and initializes) the SQLite recents database, builds the reqwest
/// transport, the Apple Music provider and the shared artwork fetcher.
pub async fn bootstrap(config: CoreConfig) -> Result<CatalogService> {
    config.validate()?;

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let pool = create_pool(&DbConfig::new(&config.storage.database_path)).await?;
    let recents_store = SqliteRecentsStore::new(pool);
    recents_store.initialize().await?;
    let recents: Arc<dyn RecentsStore> = Arc::new(recents_store);

    let catalog: Arc<dyn CatalogClient> = Arc::new(
        AppleMusicConnector::new(
            Arc::clone(&http_client),
            config.api.storefront.clone(),
            config.api.developer_token.clone(),
        )
        .with_base_url(config.api.base_url.clone()),
    );

    let artwork = ArtworkFetcher::new(
        Arc::clone(&http_client),
        config.artwork.cache_budget_bytes,
    );

    info!(storefront = %config.api.storefront, "Catalog service bootstrapped");
    CatalogService::new(
        config,
        CoreDependencies::new(http_client, catalog, recents, artwork),
    )
}
