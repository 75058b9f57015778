//! TTL response cache for the proxy.
//!
//! Entries are keyed by the exact serialization of
//! `(provider, action, payload)` and live for a fixed TTL. Expired and
//! absent entries are indistinguishable to callers; expired entries are
//! dropped lazily on lookup. Payload serialization is not normalized —
//! two semantically equal payloads that serialize differently are
//! distinct entries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use codemate_common::Provider;
use serde_json::Value;
use tracing::debug;

/// Fixed time-to-live applied uniformly to all cacheable entries.
pub const CACHE_TTL: Duration = Duration::from_secs(120);

/// Build the cache key for a request tuple.
///
/// The `provider:` prefix is what `clear` uses for provider scoping, so
/// the format is load-bearing, not cosmetic.
pub fn cache_key(provider: Provider, action: &str, payload: Option<&Value>) -> String {
    match payload {
        Some(p) => format!("{}:{}:{}", provider, action, p),
        None => format!("{}:{}:", provider, action),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    expires_at: Instant,
}

/// Read-only cache introspection, for diagnostics only.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub keys: Vec<String>,
}

/// In-memory response cache with per-entry absolute expiry.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh entry for `key`, or `None`. Expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.data.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `data` under `key` for the fixed TTL, superseding any
    /// previous entry with the same key.
    pub fn insert(&mut self, key: String, data: Value) {
        self.insert_at(key, data, Instant::now());
    }

    pub(crate) fn insert_at(&mut self, key: String, data: Value, now: Instant) {
        debug!(%key, "caching broker response");
        self.entries.insert(
            key,
            CacheEntry {
                data,
                expires_at: now + CACHE_TTL,
            },
        );
    }

    /// Remove entries scoped to `provider`, or everything when `None`.
    pub fn clear(&mut self, provider: Option<Provider>) {
        match provider {
            Some(p) => {
                let prefix = format!("{}:", p);
                self.entries.retain(|key, _| !key.starts_with(&prefix));
            }
            None => self.entries.clear(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            entries: self.entries.len(),
            keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
