//! AI commands — `codemate models`, `codemate chat`, `codemate complete`.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use codemate_common::BrokerResponse;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use codemate::proxy::{ChatMessage, ChatParams};

use super::{build_proxy, render_response};

pub async fn cmd_models(project_dir: &Path) -> Result<()> {
    let proxy = build_proxy(project_dir)?;
    let spinner = broker_spinner("Fetching models");
    let response = proxy.list_models().await;
    spinner.finish_and_clear();
    render_response(&response)
}

pub async fn cmd_chat(
    project_dir: &Path,
    prompt: &str,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    system: Option<&str>,
) -> Result<()> {
    let proxy = build_proxy(project_dir)?;

    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));

    let params = ChatParams {
        model,
        temperature,
        max_tokens,
    };

    let spinner = broker_spinner("Waiting for the model");
    let response = proxy.chat_completion(&messages, &params).await;
    spinner.finish_and_clear();

    match extract_chat_text(&response) {
        Some(text) => {
            println!("{}", text);
            if let Some(usage) = &response.usage {
                eprintln!(
                    "{}",
                    style(format!("{} tokens", usage.total_tokens)).dim()
                );
            }
            Ok(())
        }
        None => render_response(&response),
    }
}

pub async fn cmd_complete(
    project_dir: &Path,
    prompt: &str,
    model: Option<String>,
    max_tokens: Option<u32>,
) -> Result<()> {
    let proxy = build_proxy(project_dir)?;
    let params = ChatParams {
        model,
        temperature: None,
        max_tokens,
    };

    let spinner = broker_spinner("Waiting for the model");
    let response = proxy.completion(prompt, &params).await;
    spinner.finish_and_clear();
    render_response(&response)
}

/// Assistant text from an OpenAI-shaped chat response, when present.
fn extract_chat_text(response: &BrokerResponse) -> Option<&str> {
    if !response.success {
        return None;
    }
    response
        .data
        .as_ref()?
        .pointer("/choices/0/message/content")?
        .as_str()
}

fn broker_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is a valid static string"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
