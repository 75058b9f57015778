//! Backend-as-a-service client wrapper.
//!
//! The backend hosts the secure execution function ("secret broker") the
//! proxy calls through. Credentials may legitimately be absent — a fresh
//! checkout, CI without secrets — so the wrapper is a sum type: every call
//! site gets `Configured` or `Unconfigured` and surfaces the latter as a
//! typed configuration error at first use instead of crashing at startup.

use codemate_common::{BrokerRequest, BrokerResponse};
use tracing::debug;

use crate::errors::{ConfigError, ProxyError};

/// The backend collaborator, present or explicitly absent.
#[derive(Debug, Clone)]
pub enum Backend {
    Configured(BackendClient),
    Unconfigured { reason: String },
}

impl Backend {
    pub fn configured(
        base_url: impl Into<String>,
        publishable_key: impl Into<String>,
        broker_function: impl Into<String>,
    ) -> Self {
        Self::Configured(BackendClient::new(base_url, publishable_key, broker_function))
    }

    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self::Unconfigured {
            reason: reason.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// The underlying client, or a descriptive configuration error.
    pub fn client(&self) -> Result<&BackendClient, ConfigError> {
        match self {
            Self::Configured(client) => Ok(client),
            Self::Unconfigured { reason } => Err(ConfigError::BackendUnconfigured {
                reason: reason.clone(),
            }),
        }
    }
}

/// HTTP client for the backend's function endpoint.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    publishable_key: String,
    broker_function: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        publishable_key: impl Into<String>,
        broker_function: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            publishable_key: publishable_key.into(),
            broker_function: broker_function.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Full URL of the secure execution function.
    pub fn function_url(&self) -> String {
        format!(
            "{}/functions/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.broker_function
        )
    }

    /// Invoke the secret broker with a bearer credential.
    ///
    /// A non-success HTTP status becomes `ProxyError::Broker` with the
    /// status and a body excerpt; connection and decode failures become
    /// `ProxyError::Transport`. No timeout is enforced here.
    pub async fn invoke_broker(
        &self,
        request: &BrokerRequest,
        bearer: &str,
    ) -> Result<BrokerResponse, ProxyError> {
        let url = self.function_url();
        debug!(provider = %request.provider, action = %request.action, "invoking secret broker");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", bearer))
            .header("apikey", &self.publishable_key)
            .json(request)
            .send()
            .await
            .map_err(ProxyError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProxyError::Broker(format!(
                "{} from broker: {}",
                status,
                excerpt(&body)
            )));
        }

        resp.json::<BrokerResponse>()
            .await
            .map_err(ProxyError::Transport)
    }
}

/// First line of a body, capped at 200 chars, for diagnostics.
fn excerpt(body: &str) -> &str {
    let line = body.lines().next().unwrap_or("");
    match line.char_indices().nth(200) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
