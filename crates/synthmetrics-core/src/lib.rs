//! synthmetrics core: metric catalog, value generation rules, and the
//! measurement data model shared by the server and tooling.
//!
//! This crate carries no transport or runtime dependencies. Randomness is
//! always passed in by the caller so behavior is reproducible under test.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `SynthError`/`Result`; in particular an
//! unknown metric kind is an error, never a silent zero.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

pub mod catalog;
pub mod error;
pub mod generator;
pub mod measurement;

pub use catalog::{Catalog, MetricDef};
pub use error::{ClientCode, Result, SynthError};
pub use generator::GenerationRule;
pub use measurement::{Measurement, MetricSummary};
