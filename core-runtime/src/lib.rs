//! Runtime plumbing shared by the whole workspace: logging bootstrap and
//! typed configuration.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ApiConfig, ArtworkConfig, CoreConfig, SearchConfig, StorageConfig};
pub use error::{Result, RuntimeError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
