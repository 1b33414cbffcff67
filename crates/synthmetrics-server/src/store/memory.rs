use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use synthmetrics_core::error::Result;
use synthmetrics_core::{Measurement, MetricSummary};

use super::MeasurementStore;

#[derive(Default)]
struct Inner {
    rows: Vec<Measurement>,
    next_id: i64,
}

/// In-process store. Rows live for the lifetime of the handle.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner { rows: Vec::new(), next_id: 1 }),
        }
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, name: &str, value: f64, when: DateTime<Utc>) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id.max(1);
        inner.next_id = id + 1;
        inner.rows.push(Measurement { id, name: name.to_string(), value, when });
        Ok(id)
    }

    async fn recent_window(&self, limit: usize) -> Result<Vec<Measurement>> {
        let inner = self.inner.read().await;
        let mut out: Vec<&Measurement> = inner.rows.iter().collect();
        out.sort_by(|a, b| b.when.cmp(&a.when).then(b.id.cmp(&a.id)));
        Ok(out.into_iter().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.inner.read().await.rows.len() as u64)
    }

    async fn summarize(&self, since: DateTime<Utc>) -> Result<Vec<MetricSummary>> {
        let inner = self.inner.read().await;
        Ok(MetricSummary::from_readings(
            inner
                .rows
                .iter()
                .filter(|m| m.when >= since)
                .map(|m| (m.name.as_str(), m.value)),
        ))
    }
}
