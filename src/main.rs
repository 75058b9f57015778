use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "codemate")]
#[command(version, about = "CodeMate Studio core — AI and GitHub calls through the secret broker")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding codemate.toml
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the models available through the broker
    Models,
    /// Send a chat prompt and print the reply
    Chat {
        prompt: String,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        temperature: Option<f64>,

        #[arg(long)]
        max_tokens: Option<u32>,

        /// Optional system prompt prepended to the conversation
        #[arg(long)]
        system: Option<String>,
    },
    /// Plain text completion for a single prompt
    Complete {
        prompt: String,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// GitHub connector operations
    Github {
        #[command(subcommand)]
        command: GithubCommands,
    },
    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Show effective configuration
    Config,
    /// Show backend configuration state and session presence
    Status,
}

#[derive(Subcommand, Clone)]
pub enum GithubCommands {
    /// Print the OAuth authorize URL to open in a browser
    AuthUrl {
        #[arg(long)]
        redirect_uri: Option<String>,
    },
    /// Exchange an OAuth authorization code for an access grant
    Connect {
        /// Authorization code; prompted for interactively when omitted
        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        redirect_uri: Option<String>,
    },
    /// List repositories accessible to the connected account
    Repos {
        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "30")]
        per_page: u32,
    },
    /// Connect a repository by pasted URL
    ConnectRepo { url: String },
}

#[derive(Subcommand, Clone)]
pub enum CacheCommands {
    /// Show entry count and cache keys
    Stats,
    /// Drop cached responses
    Clear {
        /// Restrict to one provider (openai or github)
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Models => cmd::cmd_models(&project_dir).await?,
        Commands::Chat {
            prompt,
            model,
            temperature,
            max_tokens,
            system,
        } => {
            cmd::cmd_chat(
                &project_dir,
                prompt,
                model.clone(),
                *temperature,
                *max_tokens,
                system.as_deref(),
            )
            .await?
        }
        Commands::Complete {
            prompt,
            model,
            max_tokens,
        } => cmd::cmd_complete(&project_dir, prompt, model.clone(), *max_tokens).await?,
        Commands::Github { command } => cmd::cmd_github(&project_dir, command.clone()).await?,
        Commands::Cache { command } => cmd::cmd_cache(&project_dir, command.clone()).await?,
        Commands::Config => cmd::cmd_config(&project_dir)?,
        Commands::Status => cmd::cmd_status(&project_dir).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "codemate=debug"
    } else {
        "codemate=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
