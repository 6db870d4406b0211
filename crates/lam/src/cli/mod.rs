//! lam cli definition and entrypoint.
mod ask;
mod chat;
pub mod ux;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lam_core::client::HttpBackend;
use lam_core::config::{get_config, load_dotenv};

use crate::log::setup_logging;

/// lam - chat with the LAM task and steps service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file. Defaults to lam.yml in the config directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start an interactive chat session (default).
    Chat,
    /// Send one message and print the reply.
    Ask {
        /// Message to send.
        #[arg(required = true)]
        text: Vec<String>,
        /// Print the transcript as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    load_dotenv();
    let config = get_config(cli.config).context("Failed to load configuration")?;
    let quick_replies = config.quick_replies.clone();
    let backend = Arc::new(HttpBackend::new(config));

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::execute(backend, quick_replies).await,
        Commands::Ask { text, json } => ask::execute(backend, &text.join(" "), json).await,
    }
}
