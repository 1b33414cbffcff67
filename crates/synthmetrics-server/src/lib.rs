//! synthmetrics server library entry.
//!
//! This crate wires the measurement store, the synthesis tasks (seeder,
//! emitter loop, summary reporter) and the HTTP surface into one service.
//! It is consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod service;
pub mod store;
pub mod synth;
