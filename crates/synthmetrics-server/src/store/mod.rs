//! Measurement store contract and backends.
//!
//! The store is an append-only collection of `(name, value, when)` readings.
//! Ids are assigned on insert and strictly increase in insertion order. Reads
//! return the most recent window ordered by `(when DESC, id DESC)`.
//!
//! All handles are shared as [`SharedStore`]; backends do their own locking.

mod memory;
mod sqlite;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::{Measurement, MetricSummary};

use crate::config::{StoreBackend, StoreSection};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type SharedStore = Arc<dyn MeasurementStore>;

#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Short backend label for logs.
    fn backend(&self) -> &'static str;

    /// Create the schema if absent. Idempotent.
    async fn ensure_schema(&self) -> Result<()>;

    /// Durable append. Returns the assigned id.
    async fn insert(&self, name: &str, value: f64, when: DateTime<Utc>) -> Result<i64>;

    /// At most `limit` readings, newest first, ties broken by newest insertion.
    async fn recent_window(&self, limit: usize) -> Result<Vec<Measurement>>;

    async fn count(&self) -> Result<u64>;

    /// Per-name aggregates over readings with `when >= since`, ordered by name.
    async fn summarize(&self, since: DateTime<Utc>) -> Result<Vec<MetricSummary>>;
}

/// Open the configured backend with the bounded retry policy, then ensure the schema.
pub async fn connect(cfg: &StoreSection) -> Result<SharedStore> {
    let cfg = cfg.clone();
    retry_open(cfg.connect_attempts, cfg.retry_interval(), || {
        let cfg = cfg.clone();
        async move {
            let store: SharedStore = match cfg.backend {
                StoreBackend::Memory => Arc::new(MemoryStore::new()),
                StoreBackend::Sqlite => Arc::new(SqliteStore::open(&cfg.path).await?),
            };
            store.ensure_schema().await?;
            Ok::<SharedStore, SynthError>(store)
        }
    })
    .await
}

/// Call `open` up to `attempts` times, sleeping `interval` between failures.
pub async fn retry_open<T, F, Fut>(attempts: u32, interval: Duration, mut open: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match open().await {
            Ok(v) => {
                if attempt > 1 {
                    tracing::info!(attempt, "store became available");
                }
                return Ok(v);
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "store not available yet"
                );
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
    Err(SynthError::StoreUnavailable { attempts })
}
