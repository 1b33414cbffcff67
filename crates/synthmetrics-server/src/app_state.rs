//! Shared application state.
//!
//! Everything here is read-only after startup except the store (which does
//! its own locking) and the atomic counters, so the state is a cheap `Arc`
//! clone handed to every handler and background task.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use synthmetrics_core::error::Result;
use synthmetrics_core::Catalog;

use crate::config::ServiceConfig;
use crate::obs::ServiceMetrics;
use crate::store::SharedStore;
use crate::synth::RngFactory;

/// Who wrote a measurement. Used as the `source` label on counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertSource {
    Seed,
    Emitter,
    Submit,
    EmitNow,
}

impl InsertSource {
    pub fn as_str(self) -> &'static str {
        match self {
            InsertSource::Seed => "seed",
            InsertSource::Emitter => "emitter",
            InsertSource::Submit => "submit",
            InsertSource::EmitNow => "emit_now",
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    catalog: Catalog,
    store: SharedStore,
    metrics: ServiceMetrics,
    rng: RngFactory,
}

impl AppState {
    /// State over the built-in catalog.
    pub fn new(cfg: ServiceConfig, store: SharedStore) -> Result<Self> {
        Self::with_catalog(cfg, Catalog::builtin(), store)
    }

    pub fn with_catalog(cfg: ServiceConfig, catalog: Catalog, store: SharedStore) -> Result<Self> {
        cfg.validate()?;
        let rng = RngFactory::new(cfg.generator.seed);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                catalog,
                store,
                metrics: ServiceMetrics::default(),
                rng,
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn rng(&self) -> &RngFactory {
        &self.inner.rng
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Insert one reading and account for it under `source`.
    pub async fn record(
        &self,
        source: InsertSource,
        name: &str,
        value: f64,
        when: DateTime<Utc>,
    ) -> Result<i64> {
        let labels = [("source", source.as_str())];
        let started = Instant::now();
        let res = self.inner.store.insert(name, value, when).await;
        self.inner.metrics.insert_duration.observe(&labels, started.elapsed());
        match &res {
            Ok(_) => self.inner.metrics.inserts.inc(&labels),
            Err(_) => self.inner.metrics.insert_failures.inc(&labels),
        }
        res
    }
}
