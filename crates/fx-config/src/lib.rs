//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, EngineSettings, LoggingConfig, ProviderSettings, ProvidersConfig,
    RulesConfig,
};

use config::{Config, Environment, File};
use fx_core::SignalError;
use std::path::Path;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `FXSIGNALS__ENGINE__TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "FXSIGNALS";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] SignalError),
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigLoadError> {
    build(path, true)
}

/// Like [`load_config`], but a missing file falls back to the defaults.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigLoadError> {
    build(path, false)
}

fn build(path: &Path, required: bool) -> Result<AppConfig, ConfigLoadError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::Interval;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fxsignals-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let path = write_temp(
            "load",
            r#"
            [engine]
            timeout_secs = 5
            default_interval = "1hour"

            [providers.alphavantage]
            enabled = false
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.engine.timeout_secs, 5);
        assert_eq!(config.engine.default_interval, Interval::Hour1);
        assert!(!config.providers.alphavantage.enabled);
        assert_eq!(config.logging.level, "info");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = write_temp("invalid", "[rules]\nsma_fast = 60\n");
        assert!(matches!(load_config(&path), Err(ConfigLoadError::Invalid(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("fxsignals-does-not-exist.toml");
        assert!(matches!(load_config(&path), Err(ConfigLoadError::Load(_))));

        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.engine, EngineSettings::default());
    }
}
