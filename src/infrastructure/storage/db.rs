use crate::domain::error::WashboardError;
use crate::domain::traits::SecureStore;
use crate::infrastructure::storage::check_item;
use async_trait::async_trait;
use std::path::Path;
use tokio_rusqlite::Connection;

/// SQLite-backed secure store.
///
/// Mirrors the device keystore contract: get/set/delete by key, no listing,
/// and a hard per-item size ceiling.
pub struct SqliteStore {
    conn: Connection,
    max_item_bytes: usize,
}

impl SqliteStore {
    pub async fn open(db_path: &Path, max_item_bytes: usize) -> Result<Self, WashboardError> {
        let conn = Connection::open(db_path.to_path_buf()).await?;
        Self::init(conn, max_item_bytes).await
    }

    pub async fn open_in_memory(max_item_bytes: usize) -> Result<Self, WashboardError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn, max_item_bytes).await
    }

    async fn init(conn: Connection, max_item_bytes: usize) -> Result<Self, WashboardError> {
        conn.call(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS secure_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )
            .map(|_| ())
        })
        .await?;

        Ok(Self {
            conn,
            max_item_bytes,
        })
    }
}

#[async_trait]
impl SecureStore for SqliteStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, WashboardError> {
        use rusqlite::OptionalExtension;
        use tokio_rusqlite::params;

        check_item(key, "", self.max_item_bytes)?;
        let key = key.to_string();
        let value = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT value FROM secure_store WHERE key = ?",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await?;

        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), WashboardError> {
        use tokio_rusqlite::params;

        check_item(key, value, self.max_item_bytes)?;
        let key = key.to_string();
        let value = value.to_string();
        let now = chrono::Utc::now().timestamp();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO secure_store (key, value, updated_at) VALUES (?, ?, ?)",
                    params![key, value, now],
                )
                .map(|_| ())
            })
            .await?;

        Ok(())
    }

    async fn delete_item(&self, key: &str) -> Result<(), WashboardError> {
        use tokio_rusqlite::params;

        check_item(key, "", self.max_item_bytes)?;
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM secure_store WHERE key = ?", params![key])
                    .map(|_| ())
            })
            .await?;

        Ok(())
    }
}
