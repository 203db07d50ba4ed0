use bridge_http::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog API error {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to parse catalog response: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),
}

impl CatalogError {
    /// True for requests that were superseded or aborted rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Transport(err) if err.is_cancelled())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
