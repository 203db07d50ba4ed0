//! SQLite connection pool setup for the recents database
//!
//! WAL journal mode for concurrent readers, foreign keys enforced, and a
//! small pool; this database holds a handful of rows per kind.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::Result;

/// SQLite pool configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database URL (`sqlite:<path>` or `sqlite::memory:`)
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Configuration backed by a database file
    pub fn new(database_path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}", database_path.as_ref().display()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Configuration for an in-memory database (tests)
    ///
    /// A single connection keeps every query on the same in-memory instance.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a connection pool from the given configuration
pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;

    info!(url = %config.database_url, "Opened recents database");
    Ok(pool)
}

/// Create an in-memory pool for tests
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(&DbConfig::in_memory()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_paths() {
        let config = DbConfig::new("recents.db");
        assert_eq!(config.database_url, "sqlite:recents.db");
        assert_eq!(config.max_connections, 5);

        let config = DbConfig::in_memory().max_connections(2);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
    }

    #[tokio::test]
    async fn test_create_test_pool() {
        let pool = create_test_pool().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
