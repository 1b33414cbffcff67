//! Periodic emission of one fresh reading per catalog kind.
//!
//! Lifecycle: idle for `startup_delay`, then one pass every `interval` until
//! the cancellation token fires. Both waits race the token, so shutdown never
//! has to wait out a full interval. Store errors are counted and logged and
//! never end the loop.

use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::app_state::{AppState, InsertSource};

/// Outcome of one pass. `attempted` always equals the catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    pub attempted: usize,
    pub written: usize,
    pub failed: usize,
}

/// Generate and insert one reading per kind, in catalog order, each stamped
/// at its own insert. Failed inserts are skipped, not retried.
pub async fn emit_pass<R: Rng + Send + ?Sized>(
    state: &AppState,
    source: InsertSource,
    rng: &mut R,
) -> PassReport {
    let mut report = PassReport::default();
    for def in state.catalog() {
        report.attempted += 1;
        let value = def.rule.sample(rng);
        match state.record(source, &def.name, value, Utc::now()).await {
            Ok(_) => report.written += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    metric = %def.name,
                    source = source.as_str(),
                    error = %e,
                    "insert failed"
                );
            }
        }
    }
    report
}

/// Spawn the loop with the configured cadence.
pub fn spawn(state: AppState, token: CancellationToken) -> JoinHandle<()> {
    let delay = state.cfg().emitter.startup_delay();
    let interval = state.cfg().emitter.interval();
    tokio::spawn(run(state, delay, interval, token))
}

pub async fn run(state: AppState, delay: Duration, interval: Duration, token: CancellationToken) {
    let mut rng = state.rng().next_rng();
    tracing::info!(
        delay_ms = delay.as_millis() as u64,
        interval_ms = interval.as_millis() as u64,
        "emitter scheduled"
    );

    tokio::select! {
        _ = token.cancelled() => {
            tracing::info!("emitter cancelled before first pass");
            return;
        }
        _ = tokio::time::sleep(delay) => {}
    }

    loop {
        let report = emit_pass(&state, InsertSource::Emitter, &mut rng).await;
        state.metrics().emitter_passes.inc(&[]);
        tracing::debug!(written = report.written, failed = report.failed, "emitter pass");

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::info!("emitter stopped");
}
