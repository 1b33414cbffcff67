//! Process lifecycle: connect, seed, spawn background tasks, serve, drain.

use synthmetrics_core::error::{Result, SynthError};

use tokio_util::sync::CancellationToken;

use crate::app_state::AppState;
use crate::config::ServiceConfig;
use crate::router;
use crate::store;
use crate::synth::{emitter, reporter, seeder};

/// Run the service until `shutdown` is cancelled.
///
/// Startup failures (bad listen address, store unreachable after the retry
/// budget, bind errors) are returned before any traffic is accepted.
pub async fn run(cfg: ServiceConfig, shutdown: CancellationToken) -> Result<()> {
    let listen = cfg.server.listen_addr()?;

    let store = store::connect(&cfg.store).await?;
    tracing::info!(backend = store.backend(), "store ready");

    let state = AppState::new(cfg, store)?;

    // connections are only accepted once `axum::serve` runs, after seeding
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SynthError::Internal(format!("bind {listen} failed: {e}")))?;

    if state.cfg().seed.enabled {
        let mut rng = state.rng().next_rng();
        seeder::run(&state, &mut rng).await?;
    }

    let mut tasks = Vec::new();
    if state.cfg().emitter.enabled {
        tasks.push(emitter::spawn(state.clone(), shutdown.child_token()));
    }
    if state.cfg().summary.enabled {
        tasks.push(reporter::spawn(state.clone(), shutdown.child_token()));
    }

    tracing::info!(%listen, kinds = state.catalog().len(), "synthmetrics listening");
    let app = router::build_router(state.clone());
    let drain_state = state.clone();
    let drain = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            drain.cancelled().await;
            drain_state.set_draining();
            tracing::info!("draining");
        })
        .await
        .map_err(|e| SynthError::Internal(format!("server failed: {e}")));

    // the server may also stop on its own error; background tasks go with it
    shutdown.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "background task ended abnormally");
        }
    }
    served
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
