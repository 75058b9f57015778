//! GitHub connector commands — `codemate github ...`.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;

use codemate::config::StudioConfig;

use super::{build_proxy, render_response};
use crate::GithubCommands;

/// Fallback redirect when neither the flag nor the config provides one.
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8787/callback";

pub async fn cmd_github(project_dir: &Path, command: GithubCommands) -> Result<()> {
    let proxy = build_proxy(project_dir)?;

    match command {
        GithubCommands::AuthUrl { redirect_uri } => {
            let redirect = resolve_redirect(project_dir, redirect_uri)?;
            let response = proxy.github_authorize_url(&redirect).await;
            render_response(&response)
        }
        GithubCommands::Connect { code, redirect_uri } => {
            let code = match code {
                Some(code) => code,
                None => Input::<String>::new()
                    .with_prompt("Authorization code")
                    .interact_text()
                    .context("Failed to read authorization code")?,
            };
            let redirect = resolve_redirect(project_dir, redirect_uri)?;
            let response = proxy.github_exchange_code(&code, &redirect).await;
            if response.success {
                println!("{}", style("GitHub account connected.").green());
            }
            render_response(&response)
        }
        GithubCommands::Repos { page, per_page } => {
            let response = proxy.github_list_repos(page, per_page).await;
            render_response(&response)
        }
        GithubCommands::ConnectRepo { url } => {
            let response = proxy.github_connect_repo(&url).await;
            render_response(&response)
        }
    }
}

fn resolve_redirect(project_dir: &Path, flag: Option<String>) -> Result<String> {
    if let Some(redirect) = flag {
        return Ok(redirect);
    }
    let config = StudioConfig::new(project_dir)?;
    Ok(config
        .github_redirect_uri()
        .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()))
}
