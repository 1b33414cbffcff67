use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Hands out independent `StdRng`s.
///
/// With a configured seed every rng is derived from `seed + n` where `n` is
/// the number of rngs issued so far, so a single-threaded run is reproducible.
/// Without one each rng is seeded from OS entropy.
#[derive(Debug)]
pub struct RngFactory {
    seed: Option<u64>,
    issued: AtomicU64,
}

impl RngFactory {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed, issued: AtomicU64::new(0) }
    }

    pub fn next_rng(&self) -> StdRng {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(n)),
            None => StdRng::from_entropy(),
        }
    }
}
