//! careerchat CLI: the main entry point.
//!
//! Commands:
//! - `onboard`  Write a starter config and knowledge directory
//! - `chat`     Interactive chat or single-message mode
//! - `serve`    Start the HTTP chat gateway

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(
    name = "careerchat",
    about = "careerchat: a persona career chatbot with lead capture",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ./careerchat.toml)
    #[arg(short, long, global = true, env = "CAREERCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file and knowledge directory
    Onboard,

    /// Chat with the persona
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the HTTP chat gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Onboard => commands::onboard::run(config_path).await?,
        Commands::Chat { message } => commands::chat::run(config_path, message).await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
    }

    Ok(())
}
