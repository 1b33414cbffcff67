//! HTTP surface driven through the router without binding a socket.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use synthmetrics_server::app_state::AppState;
use synthmetrics_server::config::MAX_SUMMARY_WINDOW_SECS;
use synthmetrics_server::router::build_router;
use synthmetrics_server::store::MemoryStore;

use common::{flaky_state, memory_state, test_config, FlakyStore};

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn submit_then_query_recent() {
    let (state, _) = memory_state();
    let app = build_router(state);

    let (status, body) = post_json(&app, "/metrics", r#"{"name":"cpu.usage","value":42.5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));

    let (status, rows) = get_json(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "cpu.usage");
    assert_eq!(rows[0]["value"], 42.5);
    assert!(rows[0]["id"].is_i64());
    assert!(rows[0]["when"].is_string());
}

#[tokio::test]
async fn submit_missing_value_is_rejected_without_writing() {
    let (state, store) = memory_state();
    let app = build_router(state.clone());

    let (status, body) = post_json(&app, "/metrics", r#"{"name":"cpu.usage"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["err"].as_str().unwrap().contains("value"));
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(state.metrics().http_rejections.get(&[("reason", "malformed")]), 1);
}

#[tokio::test]
async fn submit_rejects_ill_typed_and_unparseable_bodies() {
    let (state, store) = memory_state();
    let app = build_router(state);

    for bad in [
        r#"{"name":"cpu.usage","value":"42"}"#,
        r#"{"name":7,"value":1.0}"#,
        r#"{"name":"cpu.usage","value":null}"#,
        r#"{"name":"cpu.usage","#,
        "",
    ] {
        let (status, body) = post_json(&app, "/metrics", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {bad}");
        assert!(body["err"].is_string());
    }
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn submit_without_json_content_type_is_a_client_error() {
    let (state, store) = memory_state();
    let app = build_router(state);

    let req = Request::post("/metrics")
        .body(Body::from(r#"{"name":"cpu.usage","value":1.0}"#))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn submit_unknown_kind_is_rejected() {
    let (state, store) = memory_state();
    let app = build_router(state);

    let (status, body) = post_json(&app, "/metrics", r#"{"name":"gpu.temp","value":1.0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_METRIC_KIND");
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn submit_store_failure_is_a_server_error() {
    let (state, _) = flaky_state(FlakyStore::failing_everything());
    let app = build_router(state.clone());

    let (status, body) = post_json(&app, "/metrics", r#"{"name":"cpu.usage","value":1.0}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORE");
    assert_eq!(state.metrics().insert_failures.get(&[("source", "submit")]), 1);
}

#[tokio::test]
async fn emit_demo_twice_appends_two_passes() {
    let (state, store) = memory_state();
    let app = build_router(state);

    for _ in 0..2 {
        let (status, body) = get_json(&app, "/emit_demo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "emitted");
        assert_eq!(body["count"], 16);
    }
    assert_eq!(store.count().await.unwrap(), 32);
}

#[tokio::test]
async fn emit_demo_reports_partial_and_total_failure() {
    let (state, _) = flaky_state(FlakyStore::failing_names(&["cpu.usage"]));
    let app = build_router(state);
    let (status, body) = get_json(&app, "/emit_demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 15);

    let (state, _) = flaky_state(FlakyStore::failing_everything());
    let app = build_router(state);
    let (status, body) = get_json(&app, "/emit_demo").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["err"].is_string());
}

#[tokio::test]
async fn recent_is_capped_at_limit() {
    let (state, _) = memory_state();
    let app = build_router(state);

    for _ in 0..35 {
        get_json(&app, "/emit_demo").await;
    }
    let (_, rows) = get_json(&app, "/metrics").await;
    assert_eq!(rows.as_array().unwrap().len(), 500);
}

#[tokio::test]
async fn summary_and_catalog_endpoints() {
    let (state, _) = memory_state();
    let app = build_router(state);

    post_json(&app, "/metrics", r#"{"name":"cpu.usage","value":10}"#).await;
    post_json(&app, "/metrics", r#"{"name":"cpu.usage","value":30}"#).await;

    let (status, body) = get_json(&app, "/metrics/summary?window_secs=60").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_secs"], 60);
    assert_eq!(body["total"], 2);
    assert_eq!(body["metrics"][0]["name"], "cpu.usage");
    assert_eq!(body["metrics"][0]["mean"], 20.0);
    assert_eq!(body["metrics"][0]["max"], 30.0);

    let (status, _) = get_json(&app, "/metrics/summary?window_secs=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&app, "/metrics/catalog").await;
    assert_eq!(status, StatusCode::OK);
    let kinds = body.as_array().unwrap();
    assert_eq!(kinds.len(), 16);
    assert_eq!(kinds[0]["name"], "api.response_time");
    assert_eq!(kinds[0]["rule"]["kind"], "uniform");
    assert_eq!(kinds[8]["rule"], serde_json::json!({ "kind": "uniform_int", "lo": 1, "n": 10 }));
}

#[tokio::test]
async fn summary_with_unparseable_window_answers_json() {
    let (state, _) = memory_state();
    let app = build_router(state.clone());

    for uri in ["/metrics/summary?window_secs=abc", "/metrics/summary?window_secs=-5"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["err"].is_string());
    }
    assert_eq!(state.metrics().http_rejections.get(&[("reason", "malformed")]), 2);
}

#[tokio::test]
async fn summary_accepts_the_longest_configured_window() {
    let mut cfg = test_config();
    cfg.summary.window_secs = MAX_SUMMARY_WINDOW_SECS;
    assert!(cfg.validate().is_ok());
    let state = AppState::new(cfg, Arc::new(MemoryStore::new())).unwrap();
    let app = build_router(state);

    let (status, body) = get_json(&app, "/metrics/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_secs"], MAX_SUMMARY_WINDOW_SECS);

    let uri = format!("/metrics/summary?window_secs={}", MAX_SUMMARY_WINDOW_SECS + 1);
    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ops_endpoints() {
    let (state, _) = memory_state();
    let app = build_router(state.clone());

    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    get_json(&app, "/emit_demo").await;
    let (status, body) = get(&app, "/ops/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("synthmetrics_inserts_total{source=\"emit_now\"} 16"));
    assert!(text.contains("synthmetrics_store_rows 16"));
    assert!(text.contains("synthmetrics_catalog_kinds 16"));

    let (status, _) = get(&app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    state.set_draining();
    let (status, body) = get(&app, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, b"draining");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (state, _) = memory_state();
    let app = build_router(state);

    let req = Request::get("/metrics")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
