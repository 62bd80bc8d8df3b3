//! Validate configuration command.

use anyhow::Result;
use fx_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Timeout: {}s", config.engine.timeout_secs);
            println!("Default interval: {}", config.engine.default_interval);
            println!(
                "SMA periods: {}/{}",
                config.rules.sma_fast, config.rules.sma_slow
            );
            println!("Momentum threshold: {}%", config.rules.momentum_threshold_pct);
            let enabled: Vec<_> = config
                .providers
                .enabled()
                .iter()
                .map(|id| id.label())
                .collect();
            println!("Providers: {}", enabled.join(", "));
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
