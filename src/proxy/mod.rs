//! Caching remote-call proxy for the secret broker.
//!
//! All outbound AI and GitHub traffic goes through one `ProxyClient`
//! constructed at startup and shared (`Arc`) across call sites — the
//! response cache is only effective if every caller goes through the same
//! instance, so consumers receive the client by injection rather than
//! global lookup.
//!
//! ## Call flow
//!
//! 1. Compute the cache key from `(provider, action, payload)`.
//! 2. Allowlisted action with a fresh entry → cached data, no network.
//! 3. No current session → "authentication required" failure, no network.
//! 4. Invoke the broker; transport and remote errors become failure
//!    responses, never faults.
//! 5. Successful cacheable responses are stored for [`CACHE_TTL`].
//!
//! Identical concurrent calls are not de-duplicated: two in-flight misses
//! may both reach the broker. The cache lock is never held across an
//! await, so a `clear_cache` racing an in-flight call is a best-effort
//! hint — the entry may be written back right after the clear.

pub mod cache;
pub mod github;
pub mod openai;

use std::sync::{Arc, Mutex, MutexGuard};

use codemate_common::{BrokerRequest, BrokerResponse, Provider, SessionStore};
use serde_json::Value;
use tracing::{debug, warn};

pub use cache::{CACHE_TTL, CacheStats, ResponseCache, cache_key};
pub use github::GitHubRepoRef;
pub use openai::{ChatMessage, ChatParams};

use crate::backend::Backend;
use crate::errors::ProxyError;

/// Actions whose successful responses may be served from cache.
///
/// Read-mostly, low-volatility listings only; everything else always hits
/// the broker.
pub const CACHEABLE_ACTIONS: &[&str] = &[openai::ACTION_LIST_MODELS, github::ACTION_LIST_REPOS];

pub fn is_cacheable(action: &str) -> bool {
    CACHEABLE_ACTIONS.contains(&action)
}

/// Shared client for all broker-mediated provider calls.
pub struct ProxyClient {
    backend: Backend,
    sessions: Arc<dyn SessionStore>,
    cache: Mutex<ResponseCache>,
}

impl ProxyClient {
    pub fn new(backend: Backend, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            sessions,
            cache: Mutex::new(ResponseCache::new()),
        }
    }

    /// Forward `(provider, action, payload)` to the broker, consulting the
    /// cache for allowlisted actions.
    ///
    /// Never returns an error: every failure mode is folded into a failure
    /// [`BrokerResponse`].
    pub async fn call(
        &self,
        provider: Provider,
        action: &str,
        payload: Option<Value>,
    ) -> BrokerResponse {
        let key = cache_key(provider, action, payload.as_ref());
        let cacheable = is_cacheable(action);

        if cacheable {
            if let Some(data) = self.cache_guard().get(&key) {
                debug!(%key, "cache hit");
                return BrokerResponse::ok(data);
            }
        }

        let session = match self.sessions.current_session().await {
            Some(session) => session,
            None => {
                debug!(provider = %provider, %action, "call rejected: no active session");
                return Self::failure(ProxyError::AuthenticationRequired);
            }
        };

        let client = match self.backend.client() {
            Ok(client) => client,
            Err(err) => return Self::failure(err.into()),
        };

        let request = BrokerRequest {
            provider,
            action: action.to_string(),
            payload,
        };

        let response = match client.invoke_broker(&request, &session.access_token).await {
            Ok(response) => response,
            Err(err) => {
                warn!(provider = %provider, %action, %err, "broker call failed");
                return Self::failure(err);
            }
        };

        if cacheable && response.success {
            if let Some(data) = &response.data {
                self.cache_guard().insert(key, data.clone());
            }
        }

        response
    }

    /// Drop cached entries for `provider`, or all entries when `None`.
    /// In-flight calls are unaffected.
    pub fn clear_cache(&self, provider: Option<Provider>) {
        self.cache_guard().clear(provider);
    }

    /// Entry count and key set, for diagnostics only.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache_guard().stats()
    }

    fn failure(err: ProxyError) -> BrokerResponse {
        BrokerResponse::fail(err.to_string())
    }

    /// The lock is only ever held across non-suspending map operations; a
    /// poisoned lock means a panic mid-operation left a still-coherent
    /// map, so recover rather than propagate.
    fn cache_guard(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codemate_common::Session;
    use serde_json::json;

    struct NoSession;

    #[async_trait]
    impl SessionStore for NoSession {
        async fn current_session(&self) -> Option<Session> {
            None
        }
    }

    struct FixedSession;

    #[async_trait]
    impl SessionStore for FixedSession {
        async fn current_session(&self) -> Option<Session> {
            Some(Session::new("tok-test"))
        }
    }

    fn unconfigured_client(sessions: Arc<dyn SessionStore>) -> ProxyClient {
        ProxyClient::new(Backend::unconfigured("backend URL is not set"), sessions)
    }

    // ── allowlist ────────────────────────────────────────────────────

    #[test]
    fn listing_actions_are_cacheable() {
        assert!(is_cacheable("models.list"));
        assert!(is_cacheable("repos.list"));
    }

    #[test]
    fn mutating_actions_are_not_cacheable() {
        assert!(!is_cacheable("chat.completions"));
        assert!(!is_cacheable("oauth.exchange"));
        assert!(!is_cacheable(""));
    }

    // ── auth gating ──────────────────────────────────────────────────

    #[tokio::test]
    async fn call_without_session_fails_before_any_network_attempt() {
        // Backend is unconfigured: if the call got past the auth gate it
        // would report a configuration error instead.
        let proxy = unconfigured_client(Arc::new(NoSession));
        let resp = proxy.call(Provider::OpenAi, "models.list", None).await;
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("Authentication required"));
    }

    #[tokio::test]
    async fn auth_gate_applies_to_every_provider_and_action() {
        let proxy = unconfigured_client(Arc::new(NoSession));
        for (provider, action) in [
            (Provider::OpenAi, "chat.completions"),
            (Provider::GitHub, "repos.list"),
        ] {
            let resp = proxy.call(provider, action, Some(json!({"k": "v"}))).await;
            assert!(!resp.success);
            assert!(resp.error.unwrap().contains("Authentication required"));
        }
    }

    #[tokio::test]
    async fn unconfigured_backend_surfaces_after_auth_gate() {
        let proxy = unconfigured_client(Arc::new(FixedSession));
        let resp = proxy.call(Provider::OpenAi, "models.list", None).await;
        assert!(!resp.success);
        let msg = resp.error.unwrap();
        assert!(msg.contains("not configured"));
        assert!(msg.contains("backend URL is not set"));
    }

    // ── cache management ─────────────────────────────────────────────

    #[tokio::test]
    async fn cached_entry_short_circuits_the_auth_gate() {
        // Pre-seed the cache; a fresh entry must be served even with no
        // session and no backend.
        let proxy = unconfigured_client(Arc::new(NoSession));
        let key = cache_key(Provider::OpenAi, "models.list", None);
        proxy.cache_guard().insert(key, json!(["gpt-a", "gpt-b"]));

        let resp = proxy.call(Provider::OpenAi, "models.list", None).await;
        assert!(resp.success);
        assert_eq!(resp.data, Some(json!(["gpt-a", "gpt-b"])));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss_and_the_call_proceeds() {
        use std::time::Instant;

        let proxy = unconfigured_client(Arc::new(FixedSession));
        let key = cache_key(Provider::OpenAi, "models.list", None);
        // Backdate the insert so the entry's TTL has already elapsed.
        let Some(past) = Instant::now().checked_sub(CACHE_TTL) else {
            return;
        };
        proxy.cache_guard().insert_at(key, json!("stale"), past);

        let resp = proxy.call(Provider::OpenAi, "models.list", None).await;
        // The stale entry was not served; the call went on toward the
        // broker and hit the configuration error instead.
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn non_allowlisted_action_ignores_seeded_cache() {
        let proxy = unconfigured_client(Arc::new(NoSession));
        let key = cache_key(Provider::OpenAi, "chat.completions", None);
        proxy.cache_guard().insert(key, json!("stale"));

        let resp = proxy.call(Provider::OpenAi, "chat.completions", None).await;
        assert!(!resp.success);
    }

    #[tokio::test]
    async fn scoped_clear_removes_only_that_provider() {
        let proxy = unconfigured_client(Arc::new(NoSession));
        proxy
            .cache_guard()
            .insert(cache_key(Provider::OpenAi, "models.list", None), json!(1));
        proxy
            .cache_guard()
            .insert(cache_key(Provider::GitHub, "repos.list", None), json!(2));

        proxy.clear_cache(Some(Provider::OpenAi));

        let stats = proxy.cache_stats();
        assert_eq!(stats.entries, 1);
        assert!(stats.keys[0].starts_with("github:"));
    }

    #[tokio::test]
    async fn global_clear_empties_the_cache() {
        let proxy = unconfigured_client(Arc::new(NoSession));
        proxy
            .cache_guard()
            .insert(cache_key(Provider::OpenAi, "models.list", None), json!(1));

        proxy.clear_cache(None);

        assert_eq!(proxy.cache_stats().entries, 0);
    }
}
