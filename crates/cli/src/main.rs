//! Bharata CLI
//!
//! Main entry point for the bharata command-line tool.
//! Answers questions about the Mahabharata in the reader's language.

mod commands;

use anyhow::Context;
use bharata_core::{config::AppConfig, logging};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, LanguagesCommand, PromptsCommand};
use std::path::PathBuf;

/// Bharata - Mahabharata question answering in 18 languages
#[derive(Parser, Debug)]
#[command(name = "bharata")]
#[command(about = "Ask questions about the Mahabharata", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "BHARATA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "BHARATA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider for paraphrasing and translation (ollama, offline)
    #[arg(short, long, global = true, env = "BHARATA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "BHARATA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive question session
    Chat(ChatCommand),

    /// List the supported answer languages
    Languages(LanguagesCommand),

    /// List the available prompt definitions
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.workspace, cli.config)
        .context("Failed to load configuration")?
        .with_overrides(
            cli.provider,
            cli.model,
            cli.log_level,
            cli.verbose,
            cli.no_color,
        );

    logging::init_logging(config.log_level.as_deref(), config.no_color)
        .context("Failed to initialize logging")?;

    config.validate().context("Invalid configuration")?;

    tracing::info!("Bharata CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Languages(_) => "languages",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Languages(cmd) => cmd.execute(),
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("'{}' failed", command_name))
}
