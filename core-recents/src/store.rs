//! Recents repository: per-kind key-sets of previously viewed identifiers

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::error::Result;
use core_catalog::{ItemId, ItemKind};

/// Repository trait for recently viewed item identifiers.
#[async_trait]
pub trait RecentsStore: Send + Sync {
    /// Read up to `limit` identifiers for one kind, most recent first.
    async fn read(&self, kind: ItemKind, limit: u32) -> Result<Vec<ItemId>>;

    /// Replace one kind's identifiers (delete-then-insert, not merge).
    async fn replace(&self, kind: ItemKind, ids: &[ItemId]) -> Result<()>;

    /// Delete one kind's identifiers.
    async fn delete(&self, kind: ItemKind) -> Result<()>;
}

/// SQLite implementation of [`RecentsStore`].
pub struct SqliteRecentsStore {
    pool: SqlitePool,
}

impl SqliteRecentsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if needed.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recent_items (
                item_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                position INTEGER NOT NULL,
                recorded_at INTEGER NOT NULL,
                PRIMARY KEY (kind, item_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recent_items_kind_time
             ON recent_items(kind, recorded_at)",
        )
        .execute(&self.pool)
        .await?;

        debug!("Recents store initialized");
        Ok(())
    }
}

#[async_trait]
impl RecentsStore for SqliteRecentsStore {
    #[instrument(skip(self))]
    async fn read(&self, kind: ItemKind, limit: u32) -> Result<Vec<ItemId>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT item_id FROM recent_items
             WHERE kind = ?
             ORDER BY recorded_at DESC, position ASC
             LIMIT ?",
        )
        .bind(kind.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        debug!(kind = %kind, count = ids.len(), "Read recent items");
        Ok(ids.into_iter().map(ItemId::new).collect())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn replace(&self, kind: ItemKind, ids: &[ItemId]) -> Result<()> {
        let recorded_at = Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recent_items WHERE kind = ?")
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, id) in ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO recent_items (item_id, kind, position, recorded_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(id.as_str())
            .bind(kind.as_str())
            .bind(position as i64)
            .bind(recorded_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(kind = %kind, "Replaced recent items");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ItemKind) -> Result<()> {
        sqlx::query("DELETE FROM recent_items WHERE kind = ?")
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;

        debug!(kind = %kind, "Deleted recent items");
        Ok(())
    }
}
