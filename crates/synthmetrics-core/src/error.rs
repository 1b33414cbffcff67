//! Shared error type across synthmetrics crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed submission.
    BadRequest,
    /// Metric name is not part of the catalog.
    UnknownMetricKind,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Measurement store rejected the operation.
    Store,
    /// Measurement store could not be reached.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnknownMetricKind => "UNKNOWN_METRIC_KIND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Store => "STORE",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Whether the caller (not the server) is at fault.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ClientCode::BadRequest | ClientCode::UnknownMetricKind | ClientCode::UnsupportedVersion
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown metric kind: {0}")]
    UnknownMetricKind(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("config: {0}")]
    Config(String),
    #[error("store: {0}")]
    Store(String),
    #[error("store unavailable after {attempts} attempts")]
    StoreUnavailable { attempts: u32 },
    #[error("internal: {0}")]
    Internal(String),
}

impl SynthError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SynthError::BadRequest(_) => ClientCode::BadRequest,
            SynthError::UnknownMetricKind(_) => ClientCode::UnknownMetricKind,
            SynthError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            SynthError::Config(_) => ClientCode::BadRequest,
            SynthError::Store(_) => ClientCode::Store,
            SynthError::StoreUnavailable { .. } => ClientCode::Unavailable,
            SynthError::InvalidCatalog(_) | SynthError::Internal(_) => ClientCode::Internal,
        }
    }
}
