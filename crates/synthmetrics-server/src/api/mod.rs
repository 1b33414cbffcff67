//! Public HTTP surface.
//!
//! - `POST /metrics`         : submit one `{name, value}` reading
//! - `GET  /metrics`         : most recent window, newest first
//! - `GET  /metrics/summary` : per-name count/mean/min/max over a window
//! - `GET  /metrics/catalog` : known kinds and their generation rules
//! - `GET  /emit_demo`       : run one emission pass now

pub mod error;
pub mod metrics;

pub use error::ApiError;
