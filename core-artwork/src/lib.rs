//! Artwork pipeline: a process-wide byte-bounded cache plus a single-flight
//! fetch sequencer shared by all concurrently visible cells.
//!
//! Every failure in this pipeline is deliberately swallowed: callers observe
//! `None` and render a placeholder; absence of artwork is the only
//! user-visible symptom. The crate therefore exposes no `Result` API.

pub mod cache;
pub mod fetcher;

pub use cache::{ArtworkCache, ArtworkImage};
pub use fetcher::ArtworkFetcher;
