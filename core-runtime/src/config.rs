//! Typed configuration for the catalog client core
//!
//! Every section deserializes with serde and falls back to production
//! defaults for missing fields, so hosts can ship partial config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, RuntimeError};

/// Top-level configuration for the core
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub search: SearchConfig,
    pub artwork: ArtworkConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

/// Search pagination and recents limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum batch size per remote search
    pub page_limit: u32,
    /// Initial pagination offset; also the fixed window growth step
    pub page_offset: u32,
    /// Maximum persisted identifiers pre-seeding a session
    pub recents_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_limit: 25,
            page_offset: 25,
            recents_limit: 10,
        }
    }
}

/// Artwork cache and sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    /// Byte budget for the process-wide artwork cache
    pub cache_budget_bytes: usize,
    /// Square pixel size requested from artwork URL templates
    pub default_size_px: u32,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            cache_budget_bytes: 100_000_000,
            default_size_px: 200,
        }
    }
}

/// On-device storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file for the recents store
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("catalog.db"),
        }
    }
}

/// Remote catalog service endpoints and credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base URL
    pub base_url: String,
    /// Storefront (region) identifier
    pub storefront: String,
    /// Developer bearer token
    pub developer_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.music.apple.com".to_string(),
            storefront: "us".to_string(),
            developer_token: String::new(),
        }
    }
}

impl CoreConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.database_path = path.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    pub fn with_storefront(mut self, storefront: impl Into<String>) -> Self {
        self.api.storefront = storefront.into();
        self
    }

    pub fn with_developer_token(mut self, token: impl Into<String>) -> Self {
        self.api.developer_token = token.into();
        self
    }

    /// Check invariants the rest of the core assumes.
    pub fn validate(&self) -> Result<()> {
        if self.search.page_limit == 0 {
            return Err(RuntimeError::InvalidConfig(
                "search.page_limit must be greater than zero".to_string(),
            ));
        }
        if self.search.page_offset == 0 {
            return Err(RuntimeError::InvalidConfig(
                "search.page_offset must be greater than zero".to_string(),
            ));
        }
        if self.search.recents_limit == 0 {
            return Err(RuntimeError::InvalidConfig(
                "search.recents_limit must be greater than zero".to_string(),
            ));
        }
        if self.artwork.cache_budget_bytes == 0 {
            return Err(RuntimeError::InvalidConfig(
                "artwork.cache_budget_bytes must be greater than zero".to_string(),
            ));
        }
        if self.artwork.default_size_px == 0 {
            return Err(RuntimeError::InvalidConfig(
                "artwork.default_size_px must be greater than zero".to_string(),
            ));
        }
        if !self.api.base_url.starts_with("http") {
            return Err(RuntimeError::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.storefront.is_empty() {
            return Err(RuntimeError::InvalidConfig(
                "api.storefront must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
