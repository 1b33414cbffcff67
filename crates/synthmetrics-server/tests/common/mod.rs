//! Shared fixtures for server integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::{Measurement, MetricSummary};
use synthmetrics_server::app_state::AppState;
use synthmetrics_server::config::{ServiceConfig, StoreBackend};
use synthmetrics_server::store::{MeasurementStore, MemoryStore, SharedStore};

/// Memory-backed config with a fixed generator seed.
pub fn test_config() -> ServiceConfig {
    let mut cfg = ServiceConfig::default();
    cfg.store.backend = StoreBackend::Memory;
    cfg.generator.seed = Some(7);
    cfg
}

pub fn memory_state() -> (AppState, SharedStore) {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = AppState::new(test_config(), Arc::clone(&store)).unwrap();
    (state, store)
}

/// Memory store that rejects inserts for chosen names, or all inserts, and
/// can stall each insert.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: HashSet<String>,
    fail_all: AtomicBool,
    insert_delay: Option<Duration>,
}

impl FlakyStore {
    pub fn failing_names(names: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: names.iter().map(|n| n.to_string()).collect(),
            fail_all: AtomicBool::new(false),
            insert_delay: None,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { insert_delay: Some(delay), ..Self::failing_names(&[]) }
    }

    pub fn failing_everything() -> Self {
        let s = Self::failing_names(&[]);
        s.fail_all.store(true, Ordering::SeqCst);
        s
    }
}

#[async_trait]
impl MeasurementStore for FlakyStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, name: &str, value: f64, when: DateTime<Utc>) -> Result<i64> {
        if let Some(delay) = self.insert_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all.load(Ordering::SeqCst) || self.failing.contains(name) {
            return Err(SynthError::Store(format!("injected failure for {name}")));
        }
        self.inner.insert(name, value, when).await
    }

    async fn recent_window(&self, limit: usize) -> Result<Vec<Measurement>> {
        self.inner.recent_window(limit).await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn summarize(&self, since: DateTime<Utc>) -> Result<Vec<MetricSummary>> {
        self.inner.summarize(since).await
    }
}

pub fn flaky_state(store: FlakyStore) -> (AppState, SharedStore) {
    let store: SharedStore = Arc::new(store);
    let state = AppState::new(test_config(), Arc::clone(&store)).unwrap();
    (state, store)
}
