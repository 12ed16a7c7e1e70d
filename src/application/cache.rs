//! Best-effort offline cache over the secure store.
//!
//! All entries share one persisted "last successful sync" marker, so they
//! expire together. Expiry is lazy: stale entries are deleted when read.

use crate::domain::error::WashboardError;
use crate::domain::model::SyncStatus;
use crate::domain::traits::{Clock, SecureStore};
use crate::infrastructure::config::OfflineConfig;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Store key of the shared sync marker (epoch millis).
pub const SYNC_TIMESTAMP_KEY: &str = "last_sync_timestamp";

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub max_age: Duration,
    pub max_entry_bytes: usize,
    pub key_prefix: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from(&OfflineConfig::default())
    }
}

impl From<&OfflineConfig> for CacheSettings {
    fn from(config: &OfflineConfig) -> Self {
        Self {
            max_age: config.max_cache_age(),
            max_entry_bytes: config.max_entry_bytes,
            key_prefix: config.key_prefix.clone(),
        }
    }
}

pub struct CacheManager {
    store: Arc<dyn SecureStore>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    last_sync: RwLock<Option<DateTime<Utc>>>,
}

impl CacheManager {
    /// Build the manager and pick up the sync marker left by a previous run.
    pub async fn open(
        store: Arc<dyn SecureStore>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        let manager = Self {
            store,
            clock,
            settings,
            last_sync: RwLock::new(None),
        };
        let persisted = manager.read_sync_marker().await.ok().flatten();
        *manager.last_sync.write().await = persisted;
        manager
    }

    /// Store key for a logical query name: prefix plus the name, escaped into
    /// the keystore alphabet. `_` becomes `__` and every other byte outside
    /// `[A-Za-z0-9.-]` becomes `_XX`, so distinct names never share an entry.
    pub fn entry_key(&self, key: &str) -> String {
        let mut encoded = String::with_capacity(self.settings.key_prefix.len() + key.len());
        encoded.push_str(&self.settings.key_prefix);
        for byte in key.bytes() {
            match byte {
                b'_' => encoded.push_str("__"),
                b if b.is_ascii_alphanumeric() || b == b'.' || b == b'-' => {
                    encoded.push(char::from(b))
                }
                b => encoded.push_str(&format!("_{:02X}", b)),
            }
        }
        encoded
    }

    /// Persist `data` under `key` when small enough, and always bump the sync marker.
    ///
    /// Never fails: store errors are logged and dropped.
    pub async fn save_to_cache<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let json = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "cache payload not serializable, skipping");
                return;
            }
        };

        if json.len() < self.settings.max_entry_bytes {
            let entry_key = self.entry_key(key);
            match self.store.set_item(&entry_key, &json).await {
                Ok(()) => debug!(key, size = json.len(), "cached payload"),
                Err(e) => warn!(key, error = %e, "failed to persist cache entry"),
            }
        } else {
            debug!(
                key,
                size = json.len(),
                limit = self.settings.max_entry_bytes,
                "payload too large for secure store, not cached"
            );
        }

        self.touch(self.clock.now()).await;
    }

    /// Cached value for `key`, or `None` when absent, stale or unreadable.
    pub async fn load_from_cache<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry_key = self.entry_key(key);
        let raw = match self.store.get_item(&entry_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                debug!(key, error = %e, "cache lookup failed");
                return None;
            }
        };

        let last_sync = match self.read_sync_marker().await {
            Ok(marker) => marker,
            Err(_) => *self.last_sync.read().await,
        };

        if let Some(last_sync) = last_sync {
            if self.clock.now() - last_sync > self.settings.max_age {
                debug!(key, %last_sync, "cache expired, purging entry");
                if let Err(e) = self.store.delete_item(&entry_key).await {
                    warn!(key, error = %e, "failed to purge expired cache entry");
                }
                return None;
            }
        }

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                debug!(key, error = %e, "cached payload unreadable");
                None
            }
        }
    }

    /// Forget the sync marker. Entries cannot be listed, so they are left to
    /// be overwritten or to expire on a later read.
    pub async fn clear_cache(&self) {
        if let Err(e) = self.store.delete_item(SYNC_TIMESTAMP_KEY).await {
            warn!(error = %e, "failed to delete sync marker");
        }
        *self.last_sync.write().await = None;
    }

    pub async fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.read().await
    }

    pub async fn status(&self, is_online: bool) -> SyncStatus {
        SyncStatus::new(is_online, self.last_sync_time().await, self.clock.now())
    }

    async fn touch(&self, now: DateTime<Utc>) {
        *self.last_sync.write().await = Some(now);
        let millis = now.timestamp_millis().to_string();
        if let Err(e) = self.store.set_item(SYNC_TIMESTAMP_KEY, &millis).await {
            warn!(error = %e, "failed to persist sync marker");
        }
    }

    async fn read_sync_marker(&self) -> Result<Option<DateTime<Utc>>, WashboardError> {
        let raw = self.store.get_item(SYNC_TIMESTAMP_KEY).await.inspect_err(|e| {
            debug!(error = %e, "failed to read sync marker");
        })?;

        Ok(raw
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis))
    }
}
