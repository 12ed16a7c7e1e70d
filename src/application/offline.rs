use crate::application::cache::CacheManager;
use crate::application::monitor::ConnectivityMonitor;
use crate::domain::model::{SyncStatus, Transition};
use crate::domain::traits::QueryClient;
use std::sync::Arc;
use tracing::info;

/// Offline-mode facade handed to the UI layer.
#[derive(Clone)]
pub struct OfflineManager {
    monitor: Arc<ConnectivityMonitor>,
    cache: Arc<CacheManager>,
    queries: Arc<dyn QueryClient>,
}

impl OfflineManager {
    pub fn new(
        monitor: Arc<ConnectivityMonitor>,
        cache: Arc<CacheManager>,
        queries: Arc<dyn QueryClient>,
    ) -> Self {
        Self {
            monitor,
            cache,
            queries,
        }
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub async fn status(&self) -> SyncStatus {
        self.cache.status(self.monitor.is_online()).await
    }

    /// Invalidate and refetch every active query.
    pub async fn force_refresh(&self) {
        info!("forcing refresh of all queries");
        self.queries.invalidate_queries().await;
    }

    /// Manual retry from the offline banner: probe now, refresh on success.
    ///
    /// A probe that itself reconnects has already refreshed everything through
    /// the monitor, so only a still-online probe triggers another refresh.
    pub async fn retry(&self) -> bool {
        let transition = self.monitor.tick().await;
        if transition == Transition::StillOnline {
            self.force_refresh().await;
        }
        transition.is_online()
    }
}
