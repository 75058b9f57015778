//! Configuration and status commands — `codemate config`, `codemate status`.

use std::path::Path;

use anyhow::Result;
use console::style;

use codemate::config::{CONFIG_FILE_NAME, StudioConfig};

use super::session_store;

pub fn cmd_config(project_dir: &Path) -> Result<()> {
    let config = StudioConfig::new(project_dir)?;
    let toml = config.toml();

    println!();
    println!("CodeMate Configuration");
    println!("======================");
    println!();

    println!("[backend]");
    match &toml.backend.url {
        Some(url) => println!("  url = \"{}\"", url),
        None => println!("  url = (unset)"),
    }
    match &toml.backend.publishable_key {
        Some(_) => println!("  publishable_key = (set)"),
        None => println!("  publishable_key = (unset)"),
    }
    println!("  broker_function = \"{}\"", toml.backend.broker_function);
    println!();

    if let Some(redirect) = &toml.github.redirect_uri {
        println!("[github]");
        println!("  redirect_uri = \"{}\"", redirect);
        println!();
    }

    // Effective values after environment overrides.
    println!("Effective values (with env overrides):");
    match config.backend_url() {
        Some(url) => println!("  backend_url = \"{}\"", url),
        None => println!("  backend_url = (unset)"),
    }
    println!(
        "  publishable_key = {}",
        if config.publishable_key().is_some() {
            "(set)"
        } else {
            "(unset)"
        }
    );
    println!("  broker_function = \"{}\"", config.broker_function());
    println!();
    println!(
        "Config file is looked up as {} in the project directory, then the user config directory.",
        CONFIG_FILE_NAME
    );

    Ok(())
}

pub async fn cmd_status(project_dir: &Path) -> Result<()> {
    let config = StudioConfig::new(project_dir)?;
    let backend = config.into_backend();

    match backend.client() {
        Ok(client) => {
            println!(
                "{} backend configured ({})",
                style("✓").green(),
                client.function_url()
            );
        }
        Err(err) => {
            println!("{} {}", style("✗").red(), err);
        }
    }

    match session_store().current_session().await {
        Some(_) => println!("{} session present", style("✓").green()),
        None => println!("{} no active session", style("✗").red()),
    }

    Ok(())
}
