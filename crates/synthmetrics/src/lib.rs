//! Top-level facade crate for synthmetrics.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use synthmetrics_core::*;
}

pub mod server {
    pub use synthmetrics_server::*;
}
