//! Layered configuration for the studio core.
//!
//! Settings come from `codemate.toml`, environment variables, and CLI
//! flags, in file → environment → CLI precedence. The file is looked up in
//! the project directory first, then under the user config directory
//! (`~/.config/codemate/codemate.toml`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! url = "https://abcd1234.backend.example.com"
//! publishable_key = "pk_live_..."
//! broker_function = "secret-broker"
//!
//! [github]
//! redirect_uri = "http://localhost:8787/callback"
//! ```
//!
//! Missing backend credentials do not abort startup: `into_backend`
//! produces `Backend::Unconfigured` and the failure surfaces, loudly and
//! descriptively, the first time a call is attempted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::Backend;

pub const CONFIG_FILE_NAME: &str = "codemate.toml";

/// Backend-as-a-service connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendSection {
    /// Base URL of the backend project.
    #[serde(default)]
    pub url: Option<String>,
    /// Publishable (client-side) API key.
    #[serde(default)]
    pub publishable_key: Option<String>,
    /// Name of the secure execution function the proxy invokes.
    #[serde(default = "default_broker_function")]
    pub broker_function: String,
}

fn default_broker_function() -> String {
    "secret-broker".to_string()
}

/// GitHub connector settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubSection {
    /// Redirect URI used when requesting an OAuth authorize URL.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// The complete codemate.toml configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodemateToml {
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub github: GithubSection,
}

impl CodemateToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse codemate.toml")
    }

    /// Load from the default locations, or return defaults when no file
    /// exists. The project directory wins over the user config directory.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        for path in candidate_paths(project_dir) {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize codemate.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

fn candidate_paths(project_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![project_dir.join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("codemate").join(CONFIG_FILE_NAME));
    }
    paths
}

/// Runtime configuration with environment overrides applied.
///
/// This is the bridge between the on-disk `CodemateToml` and what the rest
/// of the application consumes.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    toml: CodemateToml,
}

impl StudioConfig {
    pub fn new(project_dir: &Path) -> Result<Self> {
        Ok(Self {
            toml: CodemateToml::load_or_default(project_dir)?,
        })
    }

    pub fn from_toml(toml: CodemateToml) -> Self {
        Self { toml }
    }

    /// Backend base URL, environment variable winning over the file.
    pub fn backend_url(&self) -> Option<String> {
        std::env::var("CODEMATE_BACKEND_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.toml.backend.url.clone())
    }

    /// Publishable API key, environment variable winning over the file.
    pub fn publishable_key(&self) -> Option<String> {
        std::env::var("CODEMATE_BACKEND_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.toml.backend.publishable_key.clone())
    }

    /// Name of the secure execution function.
    pub fn broker_function(&self) -> String {
        std::env::var("CODEMATE_BROKER_FUNCTION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.toml.backend.broker_function.clone())
    }

    /// Default OAuth redirect URI for the GitHub connector.
    pub fn github_redirect_uri(&self) -> Option<String> {
        std::env::var("CODEMATE_GITHUB_REDIRECT")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.toml.github.redirect_uri.clone())
    }

    pub fn toml(&self) -> &CodemateToml {
        &self.toml
    }

    /// Resolve the backend collaborator from the effective settings.
    ///
    /// Missing credentials yield `Backend::Unconfigured` with a reason
    /// naming exactly what is absent; nothing fails until first use.
    pub fn into_backend(&self) -> Backend {
        match (self.backend_url(), self.publishable_key()) {
            (Some(url), Some(key)) => Backend::configured(url, key, self.broker_function()),
            (None, Some(_)) => Backend::unconfigured(
                "backend URL is not set (codemate.toml [backend].url or CODEMATE_BACKEND_URL)",
            ),
            (Some(_), None) => Backend::unconfigured(
                "publishable key is not set (codemate.toml [backend].publishable_key or CODEMATE_BACKEND_KEY)",
            ),
            (None, None) => Backend::unconfigured(
                "backend URL and publishable key are not set; copy codemate.toml.example or export CODEMATE_BACKEND_URL / CODEMATE_BACKEND_KEY",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests touching process environment run serialized; the variables
    /// are shared process state.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Save and clear an env var for the duration of a test.
    struct EnvGuard {
        key: &'static str,
        saved: Option<String>,
    }

    impl EnvGuard {
        fn clear(key: &'static str) -> Self {
            let saved = std::env::var(key).ok();
            unsafe { std::env::remove_var(key) };
            Self { key, saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.saved {
                Some(val) => unsafe { std::env::set_var(self.key, val) },
                None => unsafe { std::env::remove_var(self.key) },
            }
        }
    }

    #[test]
    fn parse_empty_toml_yields_defaults() {
        let toml = CodemateToml::parse("").unwrap();
        assert!(toml.backend.url.is_none());
        assert!(toml.backend.publishable_key.is_none());
        assert_eq!(toml.backend.broker_function, "secret-broker");
    }

    #[test]
    fn parse_full_backend_section() {
        let toml = CodemateToml::parse(
            r#"
            [backend]
            url = "https://proj.backend.example.com"
            publishable_key = "pk_test_123"
            broker_function = "broker-v2"

            [github]
            redirect_uri = "http://localhost:8787/callback"
            "#,
        )
        .unwrap();
        assert_eq!(
            toml.backend.url.as_deref(),
            Some("https://proj.backend.example.com")
        );
        assert_eq!(toml.backend.publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(toml.backend.broker_function, "broker-v2");
        assert_eq!(
            toml.github.redirect_uri.as_deref(),
            Some("http://localhost:8787/callback")
        );
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        assert!(CodemateToml::parse("[backend\nurl = ").is_err());
    }

    #[test]
    fn env_var_overrides_file_value() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _guard = EnvGuard::clear("CODEMATE_BACKEND_URL");
        let mut toml = CodemateToml::default();
        toml.backend.url = Some("https://from-file.example.com".into());
        let config = StudioConfig::from_toml(toml);

        assert_eq!(
            config.backend_url().as_deref(),
            Some("https://from-file.example.com")
        );

        unsafe { std::env::set_var("CODEMATE_BACKEND_URL", "https://from-env.example.com") };
        assert_eq!(
            config.backend_url().as_deref(),
            Some("https://from-env.example.com")
        );
    }

    #[test]
    fn missing_credentials_yield_unconfigured_backend() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _url = EnvGuard::clear("CODEMATE_BACKEND_URL");
        let _key = EnvGuard::clear("CODEMATE_BACKEND_KEY");
        let config = StudioConfig::from_toml(CodemateToml::default());
        let backend = config.into_backend();
        assert!(!backend.is_configured());
    }

    #[test]
    fn complete_credentials_yield_configured_backend() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _url = EnvGuard::clear("CODEMATE_BACKEND_URL");
        let _key = EnvGuard::clear("CODEMATE_BACKEND_KEY");
        let mut toml = CodemateToml::default();
        toml.backend.url = Some("https://proj.backend.example.com".into());
        toml.backend.publishable_key = Some("pk_test_123".into());
        let backend = StudioConfig::from_toml(toml).into_backend();
        assert!(backend.is_configured());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut toml = CodemateToml::default();
        toml.backend.url = Some("https://proj.backend.example.com".into());
        toml.save(&path).unwrap();

        let loaded = CodemateToml::load(&path).unwrap();
        assert_eq!(
            loaded.backend.url.as_deref(),
            Some("https://proj.backend.example.com")
        );
    }

    #[test]
    fn load_or_default_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let toml = CodemateToml::load_or_default(dir.path()).unwrap();
        assert!(toml.backend.url.is_none());
    }
}
