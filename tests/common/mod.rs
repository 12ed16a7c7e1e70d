//! 测试辅助工具
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use washboard::domain::error::WashboardError;
use washboard::domain::traits::{Probe, QueryClient, SecureStore};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Probe that replays a fixed script, then repeats its last answer.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<bool>>,
    last: Mutex<bool>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(script: &[bool]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            last: Mutex::new(script.last().copied().unwrap_or(true)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn push(&self, online: bool) {
        self.script.lock().unwrap().push_back(online);
        *self.last.lock().unwrap() = online;
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn check(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| *self.last.lock().unwrap())
    }
}

/// Probe that takes `delay` to answer online.
pub struct SlowProbe {
    delay: std::time::Duration,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl SlowProbe {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for SlowProbe {
    async fn check(&self) -> bool {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Query client that only counts calls.
#[derive(Default)]
pub struct CountingQueryClient {
    invalidations: AtomicUsize,
    refetches: AtomicUsize,
}

impl CountingQueryClient {
    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub fn refetches(&self) -> usize {
        self.refetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryClient for CountingQueryClient {
    async fn invalidate_queries(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }

    async fn refetch_queries(&self) {
        self.refetches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl SecureStore for BrokenStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, WashboardError> {
        Err(WashboardError::Store("keystore unavailable".to_string()))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), WashboardError> {
        Err(WashboardError::Store("keystore unavailable".to_string()))
    }

    async fn delete_item(&self, _key: &str) -> Result<(), WashboardError> {
        Err(WashboardError::Store("keystore unavailable".to_string()))
    }
}
