//! HTTP client seam shared by the catalog provider and the artwork pipeline.
//!
//! The [`HttpClient`] trait keeps network access behind an object-safe
//! abstraction so every consumer can be exercised with a mock in tests. The
//! default implementation, [`ReqwestHttpClient`], is backed by `reqwest`.

pub mod client;
pub mod error;
pub mod http;

pub use client::ReqwestHttpClient;
pub use error::{BridgeError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
