use crate::application::cache::{CacheManager, CacheSettings};
use crate::application::monitor::ConnectivityMonitor;
use crate::application::offline::OfflineManager;
use crate::application::query::QueryRegistry;
use crate::domain::error::WashboardError;
use crate::domain::traits::{Clock, Probe, SecureStore};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::probe::HttpProbe;
use reqwest::Client;
use std::sync::Arc;

/// Everything the offline layer owns, built once at start and passed to consumers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
    pub cache: Arc<CacheManager>,
    pub queries: Arc<QueryRegistry>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub offline: OfflineManager,
}

impl AppState {
    pub async fn new(store: Arc<dyn SecureStore>, config: Config) -> Result<Self, WashboardError> {
        let http_client = create_client()?;
        let probe = Arc::new(HttpProbe::new(
            http_client.clone(),
            config.offline.probe_url.clone(),
            config.offline.probe_timeout(),
        ));
        Ok(Self::assemble(store, probe, Arc::new(SystemClock), http_client, config).await)
    }

    pub async fn assemble(
        store: Arc<dyn SecureStore>,
        probe: Arc<dyn Probe>,
        clock: Arc<dyn Clock>,
        http_client: Client,
        config: Config,
    ) -> Self {
        let cache = Arc::new(
            CacheManager::open(
                store,
                Arc::clone(&clock),
                CacheSettings::from(&config.offline),
            )
            .await,
        );
        let queries = Arc::new(QueryRegistry::new(Arc::clone(&cache), Arc::clone(&clock)));
        let monitor = Arc::new(
            ConnectivityMonitor::new(probe, queries.clone(), clock)
                .with_poll_interval(config.offline.poll_interval()),
        );
        let offline = OfflineManager::new(monitor.clone(), cache.clone(), queries.clone());

        Self {
            config: Arc::new(config),
            http_client,
            cache,
            queries,
            monitor,
            offline,
        }
    }
}
