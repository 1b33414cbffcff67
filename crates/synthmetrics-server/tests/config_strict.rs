#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use synthmetrics_server::config::{self, StoreBackend};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
emitter:
  intervall_ms: 1000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
    assert_eq!(cfg.seed.passes, 20);
    assert_eq!(cfg.emitter.interval(), Duration::from_secs(10));
    assert_eq!(cfg.query.recent_limit, 500);
    assert!(cfg.generator.seed.is_none());
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_fail_validation() {
    for bad in [
        "version: 1\nquery:\n  recent_limit: 0\n",
        "version: 1\nseed:\n  passes: 0\n",
        "version: 1\nemitter:\n  interval_ms: 1\n",
        "version: 1\nstore:\n  connect_attempts: 0\n",
        "version: 1\nstore:\n  backend: postgres\n",
        "version: 1\nsummary:\n  window_secs: 0\n",
        "version: 1\nsummary:\n  window_secs: 2592001\n",
        "version: 1\nsummary:\n  window_secs: 10000000000000\n",
    ] {
        assert!(config::load_from_str(bad).is_err(), "accepted: {bad}");
    }
}

#[test]
fn longest_summary_window_is_accepted() {
    let cfg = config::load_from_str("version: 1\nsummary:\n  window_secs: 2592000\n")
        .expect("must parse");
    assert_eq!(cfg.summary.window_secs, config::MAX_SUMMARY_WINDOW_SECS);
}

#[test]
fn full_config_round_trip() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9090"
  cors: false
store:
  backend: memory
  connect_attempts: 3
  connect_retry_ms: 50
seed:
  enabled: false
  passes: 5
  step_secs: 30
emitter:
  startup_delay_ms: 0
  interval_ms: 250
generator:
  seed: 42
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert!(!cfg.server.cors);
    assert_eq!(cfg.store.backend, StoreBackend::Memory);
    assert_eq!(cfg.store.retry_interval(), Duration::from_millis(50));
    assert!(!cfg.seed.enabled);
    assert_eq!(cfg.emitter.startup_delay(), Duration::ZERO);
    assert_eq!(cfg.generator.seed, Some(42));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let cfg = config::load_or_default(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.version, 1);

    let err = config::load_from_file(path.to_str().unwrap()).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}
