//! Cache inspection commands — `codemate cache ...`.
//!
//! The cache lives in process memory, so these operate on the cache of
//! this invocation — useful for scripted sequences and for verifying
//! allowlist behavior, not a cross-process store.

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use codemate_common::Provider;
use console::style;

use super::build_proxy;
use crate::CacheCommands;

pub async fn cmd_cache(project_dir: &Path, command: CacheCommands) -> Result<()> {
    let proxy = build_proxy(project_dir)?;

    match command {
        CacheCommands::Stats => {
            let stats = proxy.cache_stats();
            println!("{} cached entries", stats.entries);
            for key in &stats.keys {
                println!("  {}", key);
            }
            Ok(())
        }
        CacheCommands::Clear { provider } => {
            let provider = match provider.as_deref() {
                Some(name) => Some(Provider::from_str(name).map_err(anyhow::Error::msg)?),
                None => None,
            };
            proxy.clear_cache(provider);
            match provider {
                Some(p) => println!("{}", style(format!("Cleared {} cache.", p)).green()),
                None => println!("{}", style("Cleared cache.").green()),
            }
            Ok(())
        }
    }
}
