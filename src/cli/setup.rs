//! Engine construction from configuration.

use anyhow::{Context, Result};
use chrono::Utc;
use fx_config::{AppConfig, ProviderSettings};
use fx_consensus::ConsensusEngine;
use fx_core::traits::Provider;
use fx_core::{CurrencyPair, Interval, ProviderId, SignalRequest};
use fx_data::{
    AlphaVantageConfig, AlphaVantageProvider, HttpSettings, ReplayProvider, TradingViewConfig,
    TradingViewProvider, TrueFxProvider, TwelveDataConfig, TwelveDataProvider,
};
use fx_indicators::IndicatorCalculator;
use fx_rules::RuleRegistry;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Build the engine with every enabled provider.
///
/// With `replay`, history providers read CSV files from that directory and
/// TradingView, which has no history to replay, is left out.
pub fn build_engine(config: &AppConfig, replay: Option<&Path>) -> Result<ConsensusEngine> {
    let calculator = IndicatorCalculator::new(config.rules.calculator())
        .context("Invalid indicator configuration")?;
    let registry = RuleRegistry::new(&config.rules.rule_settings(), &config.rules.calculator());
    let timeout = Duration::from_secs(config.engine.timeout_secs);
    let http = HttpSettings {
        timeout,
        ..HttpSettings::default()
    };

    let mut engine = ConsensusEngine::new(registry, calculator).with_timeout(timeout);
    for id in config.providers.enabled() {
        match build_provider(id, config, &http, replay)? {
            Some(provider) => {
                debug!("Registered {} ({})", id, provider.name());
                engine = engine.with_provider(provider);
            }
            None => info!("Skipping {} in replay mode", id),
        }
    }

    Ok(engine)
}

fn build_provider(
    id: ProviderId,
    config: &AppConfig,
    http: &HttpSettings,
    replay: Option<&Path>,
) -> Result<Option<Arc<dyn Provider>>> {
    let settings = config.providers.get(id);

    let provider: Arc<dyn Provider> = match (id, replay) {
        (ProviderId::TradingView, Some(_)) => return Ok(None),
        (ProviderId::AlphaVantage | ProviderId::TwelveData, Some(dir)) => {
            Arc::new(ReplayProvider::new(id, dir))
        }
        (ProviderId::TradingView, None) => {
            let mut tv = TradingViewConfig::default();
            if let Some(url) = &settings.base_url {
                tv.base_url = url.clone();
            }
            Arc::new(TradingViewProvider::new(tv, http)?)
        }
        (ProviderId::AlphaVantage, None) => {
            let av = AlphaVantageConfig::from_env(
                settings.base_url.clone(),
                key_var(settings, "ALPHA_VANTAGE_API_KEY"),
            );
            Arc::new(AlphaVantageProvider::new(av, http)?)
        }
        (ProviderId::TwelveData, None) => {
            let mut td = TwelveDataConfig::from_env(
                settings.base_url.clone(),
                key_var(settings, "TWELVE_DATA_API_KEY"),
            );
            td.output_size = config.engine.output_size;
            td.include_quote = settings.include_quote;
            Arc::new(TwelveDataProvider::new(td, http)?)
        }
        (ProviderId::TrueFx, _) => Arc::new(TrueFxProvider::new()),
    };
    Ok(Some(provider))
}

fn key_var<'a>(settings: &'a ProviderSettings, fallback: &'a str) -> &'a str {
    settings.api_key_env.as_deref().unwrap_or(fallback)
}

/// Build a request stamped with the current time.
pub fn build_request(
    symbol: &str,
    interval: Option<Interval>,
    config: &AppConfig,
) -> Result<SignalRequest> {
    let pair: CurrencyPair = symbol
        .parse()
        .with_context(|| format!("'{}' is not a currency pair (try EURUSD or EUR/USD)", symbol))?;
    let interval = interval.unwrap_or(config.engine.default_interval);

    Ok(SignalRequest::new(pair, interval, Utc::now()).with_output_size(config.engine.output_size))
}
