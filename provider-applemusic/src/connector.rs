//! Apple Music catalog connector
//!
//! Implements the `CatalogClient` trait over the catalog search and resource
//! lookup endpoints. Failures surface once to the caller; the search core
//! owns the swallow/log policy, so there is no retry loop here.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use bridge_http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_catalog::{
    CatalogClient, CatalogError, CatalogItem, ItemId, ItemKind, KindBatches, Result, SearchQuery,
};

use crate::types::{
    AlbumAttributes, ArtistAttributes, LookupResponse, SearchResponse, SongAttributes,
};

/// Apple Music API base URL
const API_BASE: &str = "https://api.music.apple.com";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apple Music catalog connector
///
/// # Example
///
/// ```ignore
/// use provider_applemusic::AppleMusicConnector;
/// use core_catalog::{CatalogClient, SearchQuery, ItemKind};
///
/// let connector = AppleMusicConnector::new(http_client, "us", developer_token);
/// let query = SearchQuery::new("abba", 25, 0, vec![ItemKind::Track]);
/// let batches = connector.search(&query).await?;
/// ```
pub struct AppleMusicConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Service base URL
    base_url: String,

    /// Storefront (region) identifier, e.g. "us"
    storefront: String,

    /// Developer bearer token
    developer_token: String,
}

impl AppleMusicConnector {
    /// Create a connector for one storefront
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `storefront` - storefront identifier, e.g. "us"
    /// * `developer_token` - developer JWT for the Authorization header
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        storefront: impl Into<String>,
        developer_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: API_BASE.to_string(),
            storefront: storefront.into(),
            developer_token: developer_token.into(),
        }
    }

    /// Point the connector at a different base URL (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resource path segment for a kind
    fn resource_path(kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Track => "songs",
            ItemKind::Person => "artists",
            ItemKind::Collection => "albums",
        }
    }

    /// `types` query parameter for a kind set
    fn types_param(kinds: &[ItemKind]) -> String {
        kinds
            .iter()
            .map(|kind| Self::resource_path(*kind))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Execute a GET against the API, mapping non-2xx statuses to errors
    async fn execute(&self, url: String) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(&self.developer_token)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(CatalogError::Api {
                status_code: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CatalogClient for AppleMusicConnector {
    #[instrument(skip(self), fields(term = %query.term, offset = query.offset))]
    async fn search(&self, query: &SearchQuery) -> Result<KindBatches> {
        let url = format!(
            "{}/v1/catalog/{}/search?term={}&types={}&limit={}&offset={}",
            self.base_url,
            self.storefront,
            urlencoding::encode(&query.term),
            Self::types_param(&query.kinds),
            query.limit,
            query.offset
        );

        let response = self.execute(url).await?;

        let parsed: SearchResponse = serde_json::from_slice(&response.body).map_err(|e| {
            CatalogError::Parse(format!("Failed to parse search response: {}", e))
        })?;

        let mut batches = KindBatches::new();
        if let Some(page) = parsed.results.songs {
            batches.set(
                ItemKind::Track,
                page.data.into_iter().filter_map(|r| r.into_item()).collect(),
            );
        }
        if let Some(page) = parsed.results.artists {
            batches.set(
                ItemKind::Person,
                page.data.into_iter().filter_map(|r| r.into_item()).collect(),
            );
        }
        if let Some(page) = parsed.results.albums {
            batches.set(
                ItemKind::Collection,
                page.data.into_iter().filter_map(|r| r.into_item()).collect(),
            );
        }

        info!(count = batches.len(), "Catalog search returned");
        Ok(batches)
    }

    #[instrument(skip(self, ids), fields(kind = %kind, count = ids.len()))]
    async fn lookup(&self, ids: &[ItemId], kind: ItemKind) -> Result<KindBatches> {
        if ids.is_empty() {
            debug!("Empty identifier set, skipping lookup");
            return Ok(KindBatches::new());
        }

        let ids_param = ids
            .iter()
            .map(ItemId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/v1/catalog/{}/{}?ids={}",
            self.base_url,
            self.storefront,
            Self::resource_path(kind),
            urlencoding::encode(&ids_param)
        );

        let response = self.execute(url).await?;

        let items: Vec<CatalogItem> = match kind {
            ItemKind::Track => {
                let parsed: LookupResponse<SongAttributes> =
                    serde_json::from_slice(&response.body).map_err(|e| {
                        CatalogError::Parse(format!("Failed to parse songs lookup: {}", e))
                    })?;
                parsed.data.into_iter().filter_map(|r| r.into_item()).collect()
            }
            ItemKind::Person => {
                let parsed: LookupResponse<ArtistAttributes> =
                    serde_json::from_slice(&response.body).map_err(|e| {
                        CatalogError::Parse(format!("Failed to parse artists lookup: {}", e))
                    })?;
                parsed.data.into_iter().filter_map(|r| r.into_item()).collect()
            }
            ItemKind::Collection => {
                let parsed: LookupResponse<AlbumAttributes> =
                    serde_json::from_slice(&response.body).map_err(|e| {
                        CatalogError::Parse(format!("Failed to parse albums lookup: {}", e))
                    })?;
                parsed.data.into_iter().filter_map(|r| r.into_item()).collect()
            }
        };

        info!(count = items.len(), "Catalog lookup returned");

        let mut batches = KindBatches::new();
        batches.set(kind, items);
        Ok(batches)
    }
}
