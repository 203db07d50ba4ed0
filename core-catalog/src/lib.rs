//! Catalog item model and remote catalog client seam.
//!
//! Items come in three kinds (tracks, people, collections); identity for
//! de-duplication is always the catalog-assigned identifier, never display
//! fields. The [`CatalogClient`] trait is the only path to the remote
//! service; providers implement it, everything else consumes it.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CatalogClient, KindBatches, SearchQuery};
pub use error::{CatalogError, Result};
pub use models::{
    ArtworkRef, CatalogItem, CollectionSummary, ItemId, ItemKind, PersonSummary, TrackSummary,
};
