//! Typed error hierarchy for the studio core.
//!
//! Two top-level enums cover the two failure domains:
//! - `ConfigError` — missing or invalid configuration, surfaced at first
//!   use of the affected collaborator rather than at startup
//! - `ProxyError` — everything that can go wrong on the way to the secret
//!   broker; always converted to a failure `BrokerResponse` at the proxy
//!   boundary, never left to propagate as a fault

use thiserror::Error;

/// Configuration failures for downstream integrations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Backend is not configured: {reason}")]
    BackendUnconfigured { reason: String },

    #[error("Failed to read config file at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ParseFailed {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures on the path from `ProxyClient::call` to the secret broker.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No valid session at call time; no network call was attempted.
    #[error("Authentication required: no active session")]
    AuthenticationRequired,

    /// Network-level failure reaching the broker endpoint.
    #[error("Broker request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The broker answered, but with a non-success status or an
    /// undecodable body.
    #[error("Broker error: {0}")]
    Broker(String),

    /// Caller-supplied input rejected before any network call.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
