//! Measurement synthesis: startup backfill, the periodic emitter loop, and
//! the summary reporter.
//!
//! All three draw values from the catalog's single rule table and write
//! through [`AppState::record`](crate::app_state::AppState::record).

pub mod emitter;
pub mod reporter;
pub mod rng;
pub mod seeder;

pub use emitter::{emit_pass, PassReport};
pub use rng::RngFactory;
pub use seeder::SeedReport;
