//! Operational HTTP endpoints.
//!
//! - `/healthz`     : liveness
//! - `/readyz`      : readiness (503 when draining)
//! - `/ops/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let mut extra = vec![("synthmetrics_catalog_kinds", state.catalog().len() as u64)];
    match state.store().count().await {
        Ok(rows) => extra.push(("synthmetrics_store_rows", rows)),
        Err(e) => tracing::warn!(error = %e, "store row count unavailable"),
    }
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
