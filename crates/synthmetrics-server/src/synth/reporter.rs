//! Periodic per-metric summary of recent data, written to the log.

use chrono::{Duration as ChronoDuration, Utc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::MetricSummary;

use crate::app_state::AppState;

const TOP_N: usize = 5;

/// Summaries for readings newer than `window`.
pub async fn summarize_window(state: &AppState, window: Duration) -> Result<Vec<MetricSummary>> {
    let since = ChronoDuration::from_std(window)
        .ok()
        .and_then(|w| Utc::now().checked_sub_signed(w))
        .ok_or_else(|| {
            let secs = window.as_secs();
            SynthError::BadRequest(format!("summary window of {secs}s is out of range"))
        })?;
    state.store().summarize(since).await
}

pub fn spawn(state: AppState, token: CancellationToken) -> JoinHandle<()> {
    let window = Duration::from_secs(state.cfg().summary.window_secs);
    let interval = Duration::from_secs(state.cfg().summary.interval_secs);
    tokio::spawn(run(state, window, interval, token))
}

pub async fn run(state: AppState, window: Duration, interval: Duration, token: CancellationToken) {
    loop {
        match summarize_window(&state, window).await {
            Ok(summaries) => log_summaries(&summaries, window),
            Err(e) => tracing::warn!(error = %e, "summary query failed"),
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::info!("summary reporter stopped");
}

fn log_summaries(summaries: &[MetricSummary], window: Duration) {
    if summaries.is_empty() {
        tracing::debug!(window_secs = window.as_secs(), "no data in summary window");
        return;
    }
    let total: u64 = summaries.iter().map(|s| s.count).sum();
    tracing::info!(
        window_secs = window.as_secs(),
        total,
        kinds = summaries.len(),
        "metric summary"
    );
    for s in summaries {
        tracing::info!(
            metric = %s.name,
            count = s.count,
            mean = s.mean,
            min = s.min,
            max = s.max,
            "summary"
        );
    }
    for (rank, s) in MetricSummary::top_by_mean(summaries, TOP_N).iter().enumerate() {
        tracing::info!(rank = rank + 1, metric = %s.name, mean = s.mean, "top by mean");
    }
}
