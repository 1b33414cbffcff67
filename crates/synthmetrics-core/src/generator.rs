//! Value generation rules.
//!
//! Every metric kind owns exactly one [`GenerationRule`]. The rule is plain
//! data so the whole table can live in one place (see [`crate::catalog`]) and
//! be shared by the seeder, the emitter loop and the on-demand emit endpoint.
//!
//! Randomness is always injected by the caller. Tests hand in a seeded
//! `StdRng`; production code hands in whatever its rng factory produced.

use rand::Rng;
use serde::Serialize;

use crate::error::{Result, SynthError};

/// Shape and range used to synthesize one plausible value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRule {
    /// Continuous uniform over `[lo, lo + span)`.
    Uniform { lo: f64, span: f64 },
    /// Integer uniform over `[lo, lo + n)`, reported as `f64`.
    UniformInt { lo: i64, n: i64 },
}

impl GenerationRule {
    pub const fn uniform(lo: f64, span: f64) -> Self {
        GenerationRule::Uniform { lo, span }
    }

    pub const fn uniform_int(lo: i64, n: i64) -> Self {
        GenerationRule::UniformInt { lo, n }
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            GenerationRule::Uniform { lo, span } => rng.gen_range(lo..lo + span),
            GenerationRule::UniformInt { lo, n } => rng.gen_range(lo..lo + n) as f64,
        }
    }

    /// Whether `value` could have been produced by this rule.
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            GenerationRule::Uniform { lo, span } => value >= lo && value < lo + span,
            GenerationRule::UniformInt { lo, n } => {
                value.fract() == 0.0 && value >= lo as f64 && value < (lo + n) as f64
            }
        }
    }

    /// Reject rules that would panic in `gen_range` or produce non-finite values.
    pub fn validate(&self) -> Result<()> {
        match *self {
            GenerationRule::Uniform { lo, span } => {
                if !lo.is_finite() || !span.is_finite() || span <= 0.0 {
                    return Err(SynthError::InvalidCatalog(format!(
                        "uniform rule needs finite lo and positive span (lo={lo}, span={span})"
                    )));
                }
            }
            GenerationRule::UniformInt { lo, n } => {
                if n < 1 || lo.checked_add(n).is_none() {
                    return Err(SynthError::InvalidCatalog(format!(
                        "uniform_int rule needs n >= 1 without overflow (lo={lo}, n={n})"
                    )));
                }
            }
        }
        Ok(())
    }
}
