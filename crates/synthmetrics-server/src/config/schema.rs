use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use synthmetrics_core::error::{Result, SynthError};

/// Longest summary window, for both config and the summary endpoint (30 days).
pub const MAX_SUMMARY_WINDOW_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub seed: SeedSection,

    #[serde(default)]
    pub emitter: EmitterSection,

    #[serde(default)]
    pub query: QuerySection,

    #[serde(default)]
    pub summary: SummarySection,

    #[serde(default)]
    pub generator: GeneratorSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            seed: SeedSection::default(),
            emitter: EmitterSection::default(),
            query: QuerySection::default(),
            summary: SummarySection::default(),
            generator: GeneratorSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SynthError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.store.validate()?;
        self.seed.validate()?;
        self.emitter.validate()?;
        self.query.validate()?;
        self.summary.validate()?;
        Ok(())
    }
}

fn bad(msg: &str) -> SynthError {
    SynthError::BadRequest(msg.into())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen(), cors: true }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|_| bad("server.listen must be a valid SocketAddr"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    #[serde(default = "default_store_path")]
    pub path: String,

    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    #[serde(default = "default_connect_retry_ms")]
    pub connect_retry_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
            connect_attempts: default_connect_attempts(),
            connect_retry_ms: default_connect_retry_ms(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=600).contains(&self.connect_attempts) {
            return Err(bad("store.connect_attempts must be between 1 and 600"));
        }
        if !(10..=60_000).contains(&self.connect_retry_ms) {
            return Err(bad("store.connect_retry_ms must be between 10 and 60000"));
        }
        if self.backend == StoreBackend::Sqlite && self.path.trim().is_empty() {
            return Err(bad("store.path must not be empty for the sqlite backend"));
        }
        Ok(())
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.connect_retry_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_seed_passes")]
    pub passes: u32,

    #[serde(default = "default_seed_step_secs")]
    pub step_secs: u64,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            enabled: true,
            passes: default_seed_passes(),
            step_secs: default_seed_step_secs(),
        }
    }
}

impl SeedSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10_000).contains(&self.passes) {
            return Err(bad("seed.passes must be between 1 and 10000"));
        }
        if !(1..=86_400).contains(&self.step_secs) {
            return Err(bad("seed.step_secs must be between 1 and 86400"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for EmitterSection {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_delay_ms: default_startup_delay_ms(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl EmitterSection {
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms < 10 {
            return Err(bad("emitter.interval_ms must be at least 10"));
        }
        Ok(())
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for QuerySection {
    fn default() -> Self {
        Self { recent_limit: default_recent_limit() }
    }
}

impl QuerySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10_000).contains(&self.recent_limit) {
            return Err(bad("query.recent_limit must be between 1 and 10000"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_summary_window_secs")]
    pub window_secs: u64,

    #[serde(default = "default_summary_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: default_summary_window_secs(),
            interval_secs: default_summary_interval_secs(),
        }
    }
}

impl SummarySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SUMMARY_WINDOW_SECS).contains(&self.window_secs) {
            return Err(SynthError::BadRequest(format!(
                "summary.window_secs must be between 1 and {MAX_SUMMARY_WINDOW_SECS}"
            )));
        }
        if self.interval_secs == 0 {
            return Err(bad("summary.interval_secs must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    /// Fixed seed for reproducible value streams; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_backend() -> StoreBackend {
    StoreBackend::Sqlite
}
fn default_store_path() -> String {
    "metrics.db".into()
}
fn default_connect_attempts() -> u32 {
    30
}
fn default_connect_retry_ms() -> u64 {
    1000
}
fn default_seed_passes() -> u32 {
    20
}
fn default_seed_step_secs() -> u64 {
    60
}
fn default_startup_delay_ms() -> u64 {
    5000
}
fn default_interval_ms() -> u64 {
    10_000
}
fn default_recent_limit() -> usize {
    500
}
fn default_summary_window_secs() -> u64 {
    3600
}
fn default_summary_interval_secs() -> u64 {
    30
}
