use crate::domain::error::WashboardError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Namespaced key-value persistence with a per-item size ceiling.
///
/// Stores cannot enumerate their keys. Implementations serialize access
/// internally, so callers never need to lock around them.
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, WashboardError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), WashboardError>;

    async fn delete_item(&self, key: &str) -> Result<(), WashboardError>;
}

/// Reachability check. Every failure collapses to `false`.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> bool;
}

/// Coarse, all-or-nothing controls of the data-fetching layer.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Mark all queries stale and refetch the active ones.
    async fn invalidate_queries(&self);

    async fn refetch_queries(&self);
}

/// Source of "now", swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
