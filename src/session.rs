//! Session store implementations.
//!
//! The auth service owns session lifecycle; these stores only surface the
//! current credential to the proxy. Expired sessions are reported as
//! absent — callers never see a stale token.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use codemate_common::{Session, SessionStore};
use tracing::warn;

pub const SESSION_FILE_NAME: &str = "session.json";

/// Reads the session document the studio app maintains on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user config directory
    /// (`~/.config/codemate/session.json`).
    pub fn default_location() -> Option<Self> {
        let dir = dirs::config_dir()?;
        Some(Self::new(dir.join("codemate").join(SESSION_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a session document. Creates parent directories as needed.
    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the session document if present.
    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable session file");
                None
            }
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn current_session(&self) -> Option<Session> {
        self.read().filter(|s| !s.is_expired())
    }
}

/// Reads the bearer token from `CODEMATE_ACCESS_TOKEN`. Headless/CI use.
#[derive(Debug, Clone, Default)]
pub struct EnvSessionStore;

#[async_trait]
impl SessionStore for EnvSessionStore {
    async fn current_session(&self) -> Option<Session> {
        let token = std::env::var("CODEMATE_ACCESS_TOKEN").ok()?;
        if token.is_empty() {
            return None;
        }
        Some(Session::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn store_in(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join(SESSION_FILE_NAME))
    }

    #[tokio::test]
    async fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).current_session().await.is_none());
    }

    #[tokio::test]
    async fn saved_session_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Session::new("tok-1")).unwrap();

        let session = store.current_session().await.unwrap();
        assert_eq!(session.access_token, "tok-1");
    }

    #[tokio::test]
    async fn expired_session_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut session = Session::new("tok-2");
        session.expires_at = Some(Utc::now() - Duration::minutes(5));
        store.save(&session).unwrap();

        assert!(store.current_session().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_session_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(store.current_session().await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Session::new("tok-3")).unwrap();
        store.clear().unwrap();

        assert!(store.current_session().await.is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
