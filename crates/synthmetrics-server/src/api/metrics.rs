use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::Duration;

use synthmetrics_core::error::SynthError;
use synthmetrics_core::{Measurement, MetricDef, MetricSummary};

use crate::api::ApiError;
use crate::app_state::{AppState, InsertSource};
use crate::config::MAX_SUMMARY_WINDOW_SECS;
use crate::synth::{emit_pass, reporter};

/// Submission body. Extra fields (e.g. `id`, `when`) are ignored.
#[derive(Debug, Deserialize)]
pub struct SubmitReq {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub window_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResp {
    pub window_secs: u64,
    pub total: u64,
    pub metrics: Vec<MetricSummary>,
}

fn reject(state: &AppState, reason: &str, err: SynthError) -> ApiError {
    state.metrics().http_rejections.inc(&[("reason", reason)]);
    ApiError(err)
}

/// POST /metrics
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReq>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload
        .map_err(|e| reject(&state, "malformed", SynthError::BadRequest(e.body_text())))?;

    if !req.value.is_finite() {
        return Err(reject(
            &state,
            "non_finite",
            SynthError::BadRequest("value must be a finite number".into()),
        ));
    }
    if !state.catalog().contains(&req.name) {
        return Err(reject(
            &state,
            "unknown_kind",
            SynthError::UnknownMetricKind(req.name),
        ));
    }

    state
        .record(InsertSource::Submit, &req.name, req.value, Utc::now())
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// GET /metrics
pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<Measurement>>, ApiError> {
    let limit = state.cfg().query.recent_limit;
    let rows = state.store().recent_window(limit).await?;
    Ok(Json(rows))
}

/// GET /emit_demo
pub async fn emit_now(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut rng = state.rng().next_rng();
    let report = emit_pass(&state, InsertSource::EmitNow, &mut rng).await;
    if report.attempted > 0 && report.written == 0 {
        return Err(ApiError(SynthError::Store(format!(
            "all {} inserts failed",
            report.failed
        ))));
    }
    Ok(Json(json!({ "status": "emitted", "count": report.written })))
}

/// GET /metrics/summary?window_secs=N
pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResp>, ApiError> {
    let Query(q) = query
        .map_err(|e| reject(&state, "malformed", SynthError::BadRequest(e.body_text())))?;
    let window_secs = q.window_secs.unwrap_or(state.cfg().summary.window_secs);
    if !(1..=MAX_SUMMARY_WINDOW_SECS).contains(&window_secs) {
        return Err(reject(
            &state,
            "bad_window",
            SynthError::BadRequest(format!(
                "window_secs must be between 1 and {MAX_SUMMARY_WINDOW_SECS}"
            )),
        ));
    }

    let metrics = reporter::summarize_window(&state, Duration::from_secs(window_secs)).await?;
    let total = metrics.iter().map(|s| s.count).sum();
    Ok(Json(SummaryResp { window_secs, total, metrics }))
}

/// GET /metrics/catalog
pub async fn catalog(State(state): State<AppState>) -> Json<Vec<MetricDef>> {
    Json(state.catalog().iter().cloned().collect())
}
