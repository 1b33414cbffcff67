//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use synthmetrics_core::error::{Result, SynthError};

pub use schema::{
    EmitterSection, GeneratorSection, QuerySection, SeedSection, ServerSection, ServiceConfig,
    StoreBackend, StoreSection, SummarySection, MAX_SUMMARY_WINDOW_SECS,
};

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "SYNTHMETRICS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "synthmetrics.yaml";

/// Path from `SYNTHMETRICS_CONFIG`, or the default file name.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SynthError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the validated defaults.
pub fn load_or_default(path: &str) -> Result<ServiceConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            let cfg = ServiceConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(SynthError::Config(format!("read config failed ({path}): {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| SynthError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
