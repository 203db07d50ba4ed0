//! Persisted "recently viewed" item identifiers, one key-set per kind.
//!
//! The store pre-seeds a search session's result page before the user has
//! typed anything. Write semantics are replace-per-kind (delete-then-insert),
//! never merge; the freshest view history wins on every search.

pub mod db;
pub mod error;
pub mod store;

pub use db::{create_pool, create_test_pool, DbConfig};
pub use error::{RecentsError, Result};
pub use store::{RecentsStore, SqliteRecentsStore};
