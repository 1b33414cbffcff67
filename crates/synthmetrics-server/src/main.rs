//! synthmetrics server.
//!
//! Serves recent metric readings over HTTP and keeps the store supplied with
//! plausible synthetic data:
//! - startup backfill of `passes × |catalog|` readings (empty store only)
//! - one reading per kind every emitter interval
//! - `POST /metrics`, `GET /metrics`, `GET /emit_demo`

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use synthmetrics_server::{config, service};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = config::config_path();
    let cfg = match config::load_or_default(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        service::shutdown_signal().await;
        signal_token.cancel();
    });

    match service::run(cfg, shutdown).await {
        Ok(()) => {
            tracing::info!("synthmetrics stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "synthmetrics failed");
            ExitCode::FAILURE
        }
    }
}
