use crate::application::cache::CacheManager;
use crate::domain::error::WashboardError;
use crate::domain::model::{QueryResult, QuerySource};
use crate::domain::traits::{Clock, QueryClient};
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, WashboardError>> + Send + Sync>;

struct QueryEntry {
    fetcher: Fetcher,
    stale: bool,
    last: Option<QueryResult>,
}

/// Named queries with network-first fetching and offline cache fallback.
pub struct QueryRegistry {
    cache: Arc<CacheManager>,
    clock: Arc<dyn Clock>,
    queries: DashMap<String, QueryEntry>,
}

impl QueryRegistry {
    pub fn new(cache: Arc<CacheManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            clock,
            queries: DashMap::new(),
        }
    }

    /// Register (or replace) a query. New queries start stale.
    pub fn register<F, Fut>(&self, name: impl Into<String>, fetcher: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, WashboardError>> + Send + 'static,
    {
        let fetcher: Fetcher = Arc::new(move || fetcher().boxed());
        self.queries.insert(
            name.into(),
            QueryEntry {
                fetcher,
                stale: true,
                last: None,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn is_stale(&self, name: &str) -> Option<bool> {
        self.queries.get(name).map(|entry| entry.stale)
    }

    /// Last result served for `name`, from either source.
    pub fn last_result(&self, name: &str) -> Option<QueryResult> {
        self.queries.get(name).and_then(|entry| entry.last.clone())
    }

    /// Run the query.
    ///
    /// 1. Fetch from the network; on success write through to the offline cache
    /// 2. On failure, serve the cached payload if it is still valid
    /// 3. Otherwise return the fetch error
    pub async fn fetch(&self, name: &str) -> Result<QueryResult, WashboardError> {
        // Clone the fetcher out so no map guard is held across the await
        let fetcher = self
            .queries
            .get(name)
            .map(|entry| Arc::clone(&entry.fetcher))
            .ok_or_else(|| WashboardError::UnknownQuery(name.to_string()))?;

        let result = match fetcher().await {
            Ok(data) => {
                self.cache.save_to_cache(name, &data).await;
                QueryResult {
                    name: name.to_string(),
                    data,
                    source: QuerySource::Network,
                    fetched_at: self.clock.now(),
                }
            }
            Err(e) => {
                warn!(query = name, error = %e, "fetch failed, trying offline cache");
                match self.cache.load_from_cache::<Value>(name).await {
                    Some(data) => QueryResult {
                        name: name.to_string(),
                        data,
                        source: QuerySource::Cache,
                        fetched_at: self.clock.now(),
                    },
                    None => return Err(e),
                }
            }
        };

        if let Some(mut entry) = self.queries.get_mut(name) {
            entry.stale = result.source != QuerySource::Network;
            entry.last = Some(result.clone());
        }

        Ok(result)
    }
}

#[async_trait]
impl QueryClient for QueryRegistry {
    /// Mark every query stale, then refetch them all. Registered queries are
    /// the active ones, so nothing keeps serving old data after this.
    async fn invalidate_queries(&self) {
        for mut entry in self.queries.iter_mut() {
            entry.stale = true;
        }
        debug!(count = self.queries.len(), "invalidated all queries");
        self.refetch_queries().await;
    }

    async fn refetch_queries(&self) {
        let names: Vec<String> = self.queries.iter().map(|e| e.key().clone()).collect();
        for name in names {
            if let Err(e) = self.fetch(&name).await {
                warn!(query = %name, error = %e, "refetch failed");
            }
        }
    }
}
