//! Tessera CLI - log in to the identity service from a terminal

mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Commands;
use config::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use tessera_core::{FileStorage, TokenStore};
use tessera_http::{AuthClient, SessionController};
use tracing::{debug, error, warn};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Identity service client")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long, global = true, env = "TESSERA_CONFIG")]
    config: Option<PathBuf>,

    /// Identity service base URL, overriding the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Set logging level, overriding the configuration
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    logging::init_logging(&settings.log_level, cli.json_logs)?;
    debug!(
        base_url = %settings.base_url,
        token_file = %settings.token_file.display(),
        "Loaded settings"
    );

    let tokens = TokenStore::new(Arc::new(FileStorage::new(&settings.token_file)));
    let client = AuthClient::builder()
        .base_url(&settings.base_url)
        .timeout(settings.timeout())
        .token_store(tokens)
        .on_session_expired(|| warn!("Session expired, log in again"))
        .build()
        .context("Failed to build identity client")?;
    let mut controller = SessionController::new(client);

    match cli.command.execute(&mut controller).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }
}
