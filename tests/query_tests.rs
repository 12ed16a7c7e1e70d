//! 查询层与离线管理测试

mod common;

use chrono::Duration;
use common::{t0, CountingQueryClient, ScriptedProbe};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use washboard::application::cache::{CacheManager, CacheSettings};
use washboard::application::monitor::ConnectivityMonitor;
use washboard::application::offline::OfflineManager;
use washboard::application::query::QueryRegistry;
use washboard::domain::error::WashboardError;
use washboard::domain::model::QuerySource;
use washboard::domain::traits::QueryClient;
use washboard::infrastructure::clock::ManualClock;
use washboard::infrastructure::config::Config;
use washboard::infrastructure::storage::memory::MemoryStore;
use washboard::AppState;

struct Backend {
    up: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl Backend {
    fn new() -> Self {
        Self {
            up: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn register(&self, registry: &QueryRegistry, name: &str, body: serde_json::Value) {
        let up = Arc::clone(&self.up);
        let calls = Arc::clone(&self.calls);
        registry.register(name, move || {
            let up = up.load(Ordering::SeqCst);
            let body = body.clone();
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if up {
                    Ok(body)
                } else {
                    Err(WashboardError::Api("503 /lojas: Server-side exception".to_string()))
                }
            }
        });
    }
}

async fn registry() -> (Arc<ManualClock>, Arc<CacheManager>, QueryRegistry) {
    let clock = Arc::new(ManualClock::new(t0()));
    let cache = Arc::new(
        CacheManager::open(
            Arc::new(MemoryStore::default()),
            clock.clone(),
            CacheSettings::default(),
        )
        .await,
    );
    let registry = QueryRegistry::new(cache.clone(), clock.clone());
    (clock, cache, registry)
}

#[tokio::test]
async fn test_fetch_writes_through_to_cache() {
    let (_clock, cache, registry) = registry().await;
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01", "02"]));

    let result = registry.fetch("lojas").await.unwrap();

    assert_eq!(result.source, QuerySource::Network);
    assert_eq!(result.data, json!(["01", "02"]));
    assert_eq!(registry.is_stale("lojas"), Some(false));
    let cached: Option<serde_json::Value> = cache.load_from_cache("lojas").await;
    assert_eq!(cached, Some(json!(["01", "02"])));
    assert_eq!(cache.last_sync_time().await, Some(t0()));
}

#[tokio::test]
async fn test_fetch_falls_back_to_cache_when_backend_down() {
    let (clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01", "02"]));
    registry.fetch("lojas").await.unwrap();

    backend.set_up(false);
    clock.advance(Duration::hours(3));
    let result = registry.fetch("lojas").await.unwrap();

    assert_eq!(result.source, QuerySource::Cache);
    assert_eq!(result.data, json!(["01", "02"]));
    assert_eq!(registry.is_stale("lojas"), Some(true));
    assert_eq!(
        registry.last_result("lojas").map(|r| r.source),
        Some(QuerySource::Cache)
    );
}

#[tokio::test]
async fn test_fetch_error_when_nothing_cached() {
    let (_clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.set_up(false);
    backend.register(&registry, "kpis", json!({"faturamento": 1}));

    assert!(matches!(
        registry.fetch("kpis").await,
        Err(WashboardError::Api(_))
    ));
}

#[tokio::test]
async fn test_fetch_error_when_cache_expired() {
    let (clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01"]));
    registry.fetch("lojas").await.unwrap();

    backend.set_up(false);
    clock.advance(Duration::hours(25));
    assert!(registry.fetch("lojas").await.is_err());
}

#[tokio::test]
async fn test_unknown_query() {
    let (_clock, _cache, registry) = registry().await;
    assert!(matches!(
        registry.fetch("ranking").await,
        Err(WashboardError::UnknownQuery(name)) if name == "ranking"
    ));
}

#[tokio::test]
async fn test_invalidate_refetches_active_queries() {
    let (_clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01"]));
    backend.register(&registry, "kpis", json!({"atendimentos": 3}));
    assert_eq!(registry.len(), 2);

    registry.fetch("lojas").await.unwrap();
    registry.fetch("kpis").await.unwrap();
    assert_eq!(registry.is_stale("lojas"), Some(false));

    registry.invalidate_queries().await;
    assert_eq!(backend.calls(), 4);
    assert_eq!(registry.is_stale("lojas"), Some(false));
    assert_eq!(registry.is_stale("kpis"), Some(false));

    registry.refetch_queries().await;
    assert_eq!(backend.calls(), 6);
}

#[tokio::test]
async fn test_invalidate_while_backend_down_leaves_queries_stale() {
    let (_clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01"]));
    registry.fetch("lojas").await.unwrap();

    backend.set_up(false);
    registry.invalidate_queries().await;

    assert_eq!(backend.calls(), 2);
    assert_eq!(registry.is_stale("lojas"), Some(true));
    assert_eq!(
        registry.last_result("lojas").map(|r| r.source),
        Some(QuerySource::Cache)
    );
}

#[tokio::test]
async fn test_refetch_survives_failures() {
    let (_clock, _cache, registry) = registry().await;
    let backend = Backend::new();
    backend.set_up(false);
    backend.register(&registry, "heatmap", json!([[1, 2], [3, 4]]));

    registry.refetch_queries().await;
    assert_eq!(backend.calls(), 1);
    assert_eq!(registry.is_stale("heatmap"), Some(true));
    assert!(registry.last_result("heatmap").is_none());
}

async fn offline_manager(
    script: &[bool],
) -> (Arc<CountingQueryClient>, Arc<ConnectivityMonitor>, OfflineManager) {
    let clock = Arc::new(ManualClock::new(t0()));
    let queries = Arc::new(CountingQueryClient::default());
    let monitor = Arc::new(ConnectivityMonitor::new(
        Arc::new(ScriptedProbe::new(script)),
        queries.clone(),
        clock.clone(),
    ));
    let cache = Arc::new(
        CacheManager::open(
            Arc::new(MemoryStore::default()),
            clock,
            CacheSettings::default(),
        )
        .await,
    );
    let offline = OfflineManager::new(monitor.clone(), cache, queries.clone());
    (queries, monitor, offline)
}

#[tokio::test]
async fn test_force_refresh_is_a_single_invalidation() {
    let (queries, _monitor, offline) = offline_manager(&[]).await;

    offline.force_refresh().await;

    assert_eq!(queries.invalidations(), 1);
    assert_eq!(queries.refetches(), 0);
}

#[tokio::test]
async fn test_force_refresh_fetches_each_query_once() {
    let (clock, cache, registry) = registry().await;
    let registry = Arc::new(registry);
    let backend = Backend::new();
    backend.register(&registry, "lojas", json!(["01"]));
    backend.register(&registry, "ranking", json!([{"loja": "01", "posicao": 1}]));

    let monitor = Arc::new(ConnectivityMonitor::new(
        Arc::new(ScriptedProbe::new(&[true])),
        registry.clone(),
        clock,
    ));
    let offline = OfflineManager::new(monitor, cache, registry.clone());

    offline.force_refresh().await;
    assert_eq!(backend.calls(), 2);
    assert_eq!(registry.is_stale("lojas"), Some(false));

    assert!(offline.retry().await);
    assert_eq!(backend.calls(), 4);
}

#[tokio::test]
async fn test_retry_while_still_offline() {
    let (queries, monitor, offline) = offline_manager(&[false, false]).await;
    monitor.tick().await;

    assert!(!offline.retry().await);
    assert!(offline.status().await.is_offline_mode);
    assert_eq!(queries.invalidations(), 0);
    assert_eq!(queries.refetches(), 0);
}

#[tokio::test]
async fn test_retry_that_reconnects_invalidates_once() {
    let (queries, monitor, offline) = offline_manager(&[false, true, true]).await;
    monitor.tick().await;

    assert!(offline.retry().await);
    assert_eq!(queries.invalidations(), 1);
    assert_eq!(queries.refetches(), 0);
    assert!(offline.status().await.is_online);

    assert!(offline.retry().await);
    assert_eq!(queries.invalidations(), 2);
    assert_eq!(queries.refetches(), 0);
}

#[tokio::test]
async fn test_app_state_wires_reconnect_to_registry() {
    let clock = Arc::new(ManualClock::new(t0()));
    let probe = Arc::new(ScriptedProbe::new(&[false, true]));
    let state = AppState::assemble(
        Arc::new(MemoryStore::default()),
        probe,
        clock.clone(),
        reqwest::Client::new(),
        Config::default(),
    )
    .await;

    let backend = Backend::new();
    backend.register(&state.queries, "lojas", json!(["01", "02"]));
    state.queries.fetch("lojas").await.unwrap();
    assert_eq!(state.queries.is_stale("lojas"), Some(false));

    state.monitor.tick().await;
    let status = state.offline.status().await;
    assert!(status.is_offline_mode);
    assert_eq!(status.cache_age, "Agora");

    clock.advance(Duration::minutes(5));
    state.monitor.tick().await;
    assert_eq!(backend.calls(), 2);
    assert_eq!(state.queries.is_stale("lojas"), Some(false));
    assert_eq!(
        state.queries.last_result("lojas").map(|r| r.fetched_at),
        Some(t0() + Duration::minutes(5))
    );
    assert_eq!(state.offline.status().await.cache_age, "Agora");
}

#[tokio::test]
async fn test_reconnect_with_backend_still_down_keeps_cached_data() {
    let clock = Arc::new(ManualClock::new(t0()));
    let state = AppState::assemble(
        Arc::new(MemoryStore::default()),
        Arc::new(ScriptedProbe::new(&[false, true])),
        clock.clone(),
        reqwest::Client::new(),
        Config::default(),
    )
    .await;

    let backend = Backend::new();
    backend.register(&state.queries, "lojas", json!(["01", "02"]));
    state.queries.fetch("lojas").await.unwrap();

    state.monitor.tick().await;
    backend.set_up(false);
    clock.advance(Duration::minutes(5));
    state.monitor.tick().await;

    assert_eq!(backend.calls(), 2);
    assert_eq!(state.queries.is_stale("lojas"), Some(true));
    let last = state.queries.last_result("lojas").unwrap();
    assert_eq!(last.source, QuerySource::Cache);
    assert_eq!(last.data, json!(["01", "02"]));
    assert_eq!(state.offline.status().await.cache_age, "5 min atrás");
}
