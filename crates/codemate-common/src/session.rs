//! Session credential and the store seam the proxy reads it through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A credential-bearing session obtained from the auth service.
///
/// The proxy reads only `access_token`; everything else is bookkeeping for
/// the stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Absolute expiry; a session with no expiry never expires locally.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Whether the session has passed its expiry. Expired sessions are
    /// treated the same as absent ones.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() >= at,
            None => false,
        }
    }
}

/// Where the proxy obtains the current session.
///
/// Implementations must return `None` rather than an expired session; the
/// proxy treats absence and expiry identically (fail before any network
/// call).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn current_session(&self) -> Option<Session>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_without_expiry_is_never_expired() {
        assert!(!Session::new("tok").is_expired());
    }

    #[test]
    fn session_past_expiry_is_expired() {
        let mut s = Session::new("tok");
        s.expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(s.is_expired());
    }

    #[test]
    fn session_before_expiry_is_not_expired() {
        let mut s = Session::new("tok");
        s.expires_at = Some(Utc::now() + Duration::hours(1));
        assert!(!s.is_expired());
    }

    #[test]
    fn session_round_trips_through_json() {
        let s = Session::new("tok-abc");
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.access_token, "tok-abc");
        assert!(back.expires_at.is_none());
    }
}
