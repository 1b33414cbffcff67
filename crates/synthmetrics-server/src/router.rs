//! Axum router wiring.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let cors = state.cfg().server.cors;
    let app = Router::new()
        .route("/metrics", get(api::metrics::recent).post(api::metrics::submit))
        .route("/metrics/summary", get(api::metrics::summary))
        .route("/metrics/catalog", get(api::metrics::catalog))
        .route("/emit_demo", get(api::metrics::emit_now))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/ops/metrics", get(ops::metrics))
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
