//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Application: Flow engine, Dispatcher, Bot loop, Logging
//! - Infrastructure: Matrix and Console transports
//! - Interface: Plugins
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::bot::Bot;
use crate::domain::config::AppConfig;
use crate::strings::logs;

/// Plugin-driven chat bot. Without a configured Matrix service it runs in
/// console mode, reading messages from stdin.
#[derive(Debug, Parser)]
#[command(name = "botty", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Use the console transport even if a chat service is configured
    #[arg(long)]
    console: bool,
}

const INBOX_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.system)?;
    tracing::info!("{}", logs::STARTING);
    tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));

    // 3. Plugins and dispatch loop
    let dispatcher = interface::plugins::dispatcher(&config);
    tracing::info!("Plugins in dispatch order: {:?}", dispatcher.plugin_names());
    let bot = Bot::new(dispatcher, Duration::from_millis(config.system.step_interval_ms));
    let (inbox_tx, inbox_rx) = mpsc::channel(INBOX_CAPACITY);
    let bot_handle = tokio::spawn(bot.run(inbox_rx));

    // 4. Transport (returns once it stops producing messages)
    match &config.services.matrix {
        Some(matrix) if !cli.console => infrastructure::matrix::run(matrix, inbox_tx).await?,
        _ => {
            tracing::info!("{}", logs::CONSOLE_MODE);
            infrastructure::console::run(inbox_tx).await?
        }
    }

    bot_handle.await??;
    Ok(())
}
