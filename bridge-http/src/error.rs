use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl BridgeError {
    /// True for fetches that were superseded or aborted rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BridgeError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
