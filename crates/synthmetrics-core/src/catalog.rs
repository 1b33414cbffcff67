//! Metric catalog: the closed, ordered set of known metric kinds.
//!
//! The catalog is the single source of truth for which names may be stored
//! and how each one is synthesized. Adding a kind means adding one row to
//! [`BUILTIN`]; nothing else changes.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::error::{Result, SynthError};
use crate::generator::GenerationRule;

/// Built-in rule table. Order is the iteration order for seed/emit passes.
pub const BUILTIN: [(&str, GenerationRule); 16] = [
    ("api.response_time", GenerationRule::uniform(50.0, 200.0)),
    ("cpu.usage", GenerationRule::uniform(20.0, 60.0)),
    ("memory.usage", GenerationRule::uniform(30.0, 50.0)),
    ("disk.io", GenerationRule::uniform(0.0, 1000.0)),
    ("network.bandwidth", GenerationRule::uniform(0.0, 500.0)),
    ("error.rate", GenerationRule::uniform(0.0, 5.0)),
    ("request.count", GenerationRule::uniform_int(0, 1000)),
    ("db.query_time", GenerationRule::uniform(10.0, 90.0)),
    // DORA
    ("deployment.frequency", GenerationRule::uniform_int(1, 10)),
    ("lead.time.minutes", GenerationRule::uniform(30.0, 90.0)),
    ("change.failure.rate", GenerationRule::uniform(0.0, 20.0)),
    ("mttr.minutes", GenerationRule::uniform(10.0, 50.0)),
    // pipeline
    ("build.success.rate", GenerationRule::uniform(75.0, 25.0)),
    ("build.duration.seconds", GenerationRule::uniform(120.0, 480.0)),
    ("test.coverage.percent", GenerationRule::uniform(60.0, 40.0)),
    ("code.churn.lines", GenerationRule::uniform(0.0, 500.0)),
];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDef {
    pub name: String,
    pub rule: GenerationRule,
}

impl MetricDef {
    pub fn new(name: impl Into<String>, rule: GenerationRule) -> Self {
        Self { name: name.into(), rule }
    }
}

/// Immutable, ordered catalog with name lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    defs: Vec<MetricDef>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// The reference catalog of 16 kinds.
    pub fn builtin() -> Self {
        let defs = BUILTIN
            .iter()
            .map(|(name, rule)| MetricDef::new(*name, *rule))
            .collect::<Vec<_>>();
        let index = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self { defs, index }
    }

    /// Build a custom catalog. Names must be non-empty and unique, rules valid.
    pub fn new(defs: Vec<MetricDef>) -> Result<Self> {
        if defs.is_empty() {
            return Err(SynthError::InvalidCatalog("catalog must not be empty".into()));
        }
        let mut index = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if def.name.trim().is_empty() {
                return Err(SynthError::InvalidCatalog(format!("entry {i} has an empty name")));
            }
            def.rule.validate()?;
            if index.insert(def.name.clone(), i).is_some() {
                return Err(SynthError::InvalidCatalog(format!(
                    "duplicate metric kind: {}",
                    def.name
                )));
            }
        }
        Ok(Self { defs, index })
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricDef> {
        self.defs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|d| d.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fails with `UnknownMetricKind` when `name` is not catalogued.
    pub fn rule(&self, name: &str) -> Result<&GenerationRule> {
        self.index
            .get(name)
            .and_then(|i| self.defs.get(*i))
            .map(|d| &d.rule)
            .ok_or_else(|| SynthError::UnknownMetricKind(name.to_string()))
    }

    /// Synthesize one plausible value for `name`.
    pub fn generate<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<f64> {
        Ok(self.rule(name)?.sample(rng))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MetricDef;
    type IntoIter = std::slice::Iter<'a, MetricDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
