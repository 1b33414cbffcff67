//! Lightweight in-process counters.
//!
//! Background tasks never surface errors to a caller, so their inserts and
//! failures are counted here and rendered by the `/ops/metrics` handler.

pub mod metrics;

pub use metrics::{CounterVec, GaugeVec, HistogramVec, ServiceMetrics};
