//! Startup backfill.
//!
//! Writes `passes × |catalog|` readings, each stamped `i * step_secs` before
//! the moment it is written, where `i` is its pass. Runs only against an empty store, so a
//! restart never duplicates history. Individual insert failures are logged
//! and counted; the remaining passes still run.

use chrono::{Duration, Utc};
use rand::Rng;

use synthmetrics_core::error::Result;

use crate::app_state::{AppState, InsertSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Store already had data; nothing was written.
    pub skipped: bool,
    pub inserted: u64,
    pub failed: u64,
}

/// Backfill with the configured `passes`/`step_secs`.
pub async fn run<R: Rng + Send + ?Sized>(state: &AppState, rng: &mut R) -> Result<SeedReport> {
    let passes = state.cfg().seed.passes;
    let step = Duration::seconds(i64::try_from(state.cfg().seed.step_secs).unwrap_or(60));
    seed(state, passes, step, rng).await
}

pub async fn seed<R: Rng + Send + ?Sized>(
    state: &AppState,
    passes: u32,
    step: Duration,
    rng: &mut R,
) -> Result<SeedReport> {
    let existing = state.store().count().await?;
    if existing > 0 {
        tracing::info!(existing, "store already populated, skipping seed");
        return Ok(SeedReport { skipped: true, ..SeedReport::default() });
    }

    tracing::info!(passes, kinds = state.catalog().len(), "seeding sample history");
    let mut report = SeedReport::default();

    for pass in 0..passes {
        let offset = step * i32::try_from(pass).unwrap_or(i32::MAX);
        for def in state.catalog() {
            let value = def.rule.sample(rng);
            let when = Utc::now() - offset;
            match state.record(InsertSource::Seed, &def.name, value, when).await {
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(metric = %def.name, pass, error = %e, "seed insert failed");
                }
            }
        }
    }

    state
        .metrics()
        .seeded_rows
        .set(&[], i64::try_from(report.inserted).unwrap_or(i64::MAX));

    if report.failed > 0 {
        tracing::warn!(
            inserted = report.inserted,
            failed = report.failed,
            "seeding finished with failures"
        );
    } else {
        tracing::info!(inserted = report.inserted, "seeding finished");
    }
    Ok(report)
}
