//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module   | Commands handled               |
//! |----------|--------------------------------|
//! | `ai`     | `Models`, `Chat`, `Complete`   |
//! | `github` | `Github`                       |
//! | `cache`  | `Cache`                        |
//! | `config` | `Config`, `Status`             |

pub mod ai;
pub mod cache;
pub mod config;
pub mod github;

pub use ai::{cmd_chat, cmd_complete, cmd_models};
pub use cache::cmd_cache;
pub use config::{cmd_config, cmd_status};
pub use github::cmd_github;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use codemate_common::{BrokerResponse, SessionStore};
use console::style;

use codemate::config::StudioConfig;
use codemate::proxy::ProxyClient;
use codemate::session::{EnvSessionStore, FileSessionStore};

/// Build the shared proxy from the effective configuration.
///
/// One client per process; every command routes through it so the
/// response cache is shared within the invocation.
pub(crate) fn build_proxy(project_dir: &Path) -> Result<ProxyClient> {
    let config = StudioConfig::new(project_dir)?;
    let backend = config.into_backend();
    Ok(ProxyClient::new(backend, session_store()))
}

/// Pick the session source: explicit env token wins, otherwise the
/// session document the studio app maintains.
pub(crate) fn session_store() -> Arc<dyn SessionStore> {
    if std::env::var("CODEMATE_ACCESS_TOKEN").is_ok_and(|v| !v.is_empty()) {
        return Arc::new(EnvSessionStore);
    }
    match FileSessionStore::default_location() {
        Some(store) => Arc::new(store),
        None => Arc::new(EnvSessionStore),
    }
}

/// Print a broker response: extracted data on success, styled error on
/// failure. Returns an error so failures exit non-zero.
pub(crate) fn render_response(response: &BrokerResponse) -> Result<()> {
    if response.success {
        if let Some(data) = &response.data {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        if let Some(usage) = &response.usage {
            let mut line = format!(
                "{} prompt + {} completion = {} tokens",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
            if let Some(cost) = usage.cost_usd {
                line.push_str(&format!(" (${:.4})", cost));
            }
            eprintln!("{}", style(line).dim());
        }
        Ok(())
    } else {
        let message = response.error.as_deref().unwrap_or("unknown error");
        anyhow::bail!("{}", message)
    }
}
