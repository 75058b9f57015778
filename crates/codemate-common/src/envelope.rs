//! Request/response envelope for the secret-broker endpoint.
//!
//! Every outbound call names a provider, an action, and an optional JSON
//! payload. The broker answers with a uniform success/failure envelope
//! regardless of provider — callers never see transport faults, only a
//! `BrokerResponse` with `success` set one way or the other.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named external service category reachable only through the proxy.
///
/// The set is closed at this boundary; adding a provider means adding a
/// variant here and teaching the broker about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    GitHub,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::GitHub => "github",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "github" => Ok(Self::GitHub),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Body posted to the secret-broker function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerRequest {
    pub provider: Provider,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Token/cost accounting attached to successful AI responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
    /// Best-effort cost estimate in USD; absent when the broker can't price
    /// the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
}

/// Uniform result envelope returned by `ProxyClient::call`.
///
/// On success `data` carries the provider's (opaque) response payload; on
/// failure `error` carries a human-readable description. The shape is
/// invariant across providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl BrokerResponse {
    /// Successful response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            usage: None,
        }
    }

    /// Successful response with usage accounting.
    pub fn ok_with_usage(data: Value, usage: Usage) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            usage: Some(usage),
        }
    }

    /// Failure response with a diagnostic message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            usage: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }
}
