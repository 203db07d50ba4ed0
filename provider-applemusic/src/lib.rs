//! Apple Music web API catalog provider
//!
//! Implements the `core-catalog` [`CatalogClient`](core_catalog::CatalogClient)
//! trait over the Apple Music catalog endpoints (search by term, resource
//! lookup by identifier set) using a developer bearer token.

pub mod connector;
mod types;

pub use connector::AppleMusicConnector;
