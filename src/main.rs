//! Forex signal consensus CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use fx_config::{load_config_or_default, AppConfig, ConfigLoadError};
use fx_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config);

    // Setup logging; flags win over the config file
    let logging = config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| logging.level.clone());
    let _guard = setup_logging(
        &log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::Config => cli::commands::config::run().await,
        Commands::Sessions(args) => cli::commands::sessions::run(args).await,
        Commands::Signals(args) => cli::commands::signals::run(args, &loaded(config)?).await,
        Commands::Source(args) => cli::commands::source::run(args, &loaded(config)?).await,
        Commands::Providers => cli::commands::providers::run(&loaded(config)?).await,
    }
}

fn loaded(config: Result<AppConfig, ConfigLoadError>) -> Result<AppConfig> {
    config.context("Failed to load configuration")
}
