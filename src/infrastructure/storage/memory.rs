// In-memory secure store implementation using DashMap
use crate::domain::error::WashboardError;
use crate::domain::traits::SecureStore;
use crate::infrastructure::storage::check_item;
use async_trait::async_trait;
use dashmap::DashMap;

/// Thread-safe in-memory store with the same ceiling rules as the SQLite one.
///
/// Used by `--ephemeral` runs and tests that need to inspect raw entries.
pub struct MemoryStore {
    map: DashMap<String, String>,
    max_item_bytes: usize,
}

impl MemoryStore {
    pub fn new(max_item_bytes: usize) -> Self {
        Self {
            map: DashMap::new(),
            max_item_bytes,
        }
    }

    /// Raw lookup that bypasses key validation.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(2048)
    }
}

#[async_trait]
impl SecureStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, WashboardError> {
        check_item(key, "", self.max_item_bytes)?;
        Ok(self.peek(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), WashboardError> {
        check_item(key, value, self.max_item_bytes)?;
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> Result<(), WashboardError> {
        check_item(key, "", self.max_item_bytes)?;
        self.map.remove(key);
        Ok(())
    }
}
