//! Measurement data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted reading. `id` is assigned by the store, strictly increasing in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub when: DateTime<Utc>,
}

/// Per-name aggregate over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub count: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    /// Fold raw readings into per-name summaries ordered by name.
    pub fn from_readings<'a, I>(readings: I) -> Vec<MetricSummary>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut acc: std::collections::BTreeMap<&str, (u64, f64, f64, f64)> =
            std::collections::BTreeMap::new();
        for (name, value) in readings {
            let e = acc
                .entry(name)
                .or_insert((0, 0.0, f64::INFINITY, f64::NEG_INFINITY));
            e.0 += 1;
            e.1 += value;
            e.2 = e.2.min(value);
            e.3 = e.3.max(value);
        }
        acc.into_iter()
            .map(|(name, (count, sum, min, max))| MetricSummary {
                name: name.to_string(),
                count,
                mean: sum / count as f64,
                min,
                max,
            })
            .collect()
    }

    /// Top `n` names by mean value, highest first.
    pub fn top_by_mean(summaries: &[MetricSummary], n: usize) -> Vec<&MetricSummary> {
        let mut sorted: Vec<&MetricSummary> = summaries.iter().collect();
        sorted.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        sorted.truncate(n);
        sorted
    }
}
