//! OpenAI convenience wrappers.
//!
//! Pure parameter-shaping over [`ProxyClient::call`]; no extra state or
//! failure modes. The broker holds the provider key — nothing here ever
//! sees a secret.

use codemate_common::{BrokerResponse, Provider};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ProxyClient;

pub const ACTION_CHAT_COMPLETION: &str = "chat.completions";
pub const ACTION_COMPLETION: &str = "completions";
pub const ACTION_LIST_MODELS: &str = "models.list";

/// Model used when the caller doesn't pick one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Optional generation parameters shared by the AI wrappers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatParams {
    fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

impl ProxyClient {
    /// Chat-style completion over a message history.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        params: &ChatParams,
    ) -> BrokerResponse {
        let mut payload = json!({
            "model": params.model_or_default(),
            "messages": messages,
        });
        if let Some(t) = params.temperature {
            payload["temperature"] = json!(t);
        }
        if let Some(m) = params.max_tokens {
            payload["max_tokens"] = json!(m);
        }
        self.call(Provider::OpenAi, ACTION_CHAT_COMPLETION, Some(payload))
            .await
    }

    /// Plain text completion for a single prompt.
    pub async fn completion(&self, prompt: &str, params: &ChatParams) -> BrokerResponse {
        let mut payload = json!({
            "model": params.model_or_default(),
            "prompt": prompt,
        });
        if let Some(m) = params.max_tokens {
            payload["max_tokens"] = json!(m);
        }
        self.call(Provider::OpenAi, ACTION_COMPLETION, Some(payload))
            .await
    }

    /// List the models available through the broker. Cache-backed.
    pub async fn list_models(&self) -> BrokerResponse {
        self.call(Provider::OpenAi, ACTION_LIST_MODELS, None).await
    }
}
