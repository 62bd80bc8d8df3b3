//! Configuration structures.

use fx_core::{Interval, ProviderId, SignalError};
use fx_indicators::CalculatorConfig;
use fx_rules::RuleSettings;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), SignalError> {
        self.logging.validate()?;
        self.engine.validate()?;
        self.rules.validate()
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, SignalError> {
        toml::to_string_pretty(self).map_err(|e| SignalError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "fxsignals".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file, in addition to stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), SignalError> {
        if !self.is_json() && !self.format.eq_ignore_ascii_case("pretty") {
            return Err(SignalError::Config(format!(
                "Unknown log format: {} (expected pretty or json)",
                self.format
            )));
        }
        Ok(())
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Per-source deadline
    pub timeout_secs: u64,
    pub default_interval: Interval,
    /// Bars requested from history providers
    pub output_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            default_interval: Interval::Minute15,
            output_size: 100,
        }
    }
}

impl EngineSettings {
    fn validate(&self) -> Result<(), SignalError> {
        if self.timeout_secs == 0 {
            return Err(SignalError::Config("Engine timeout must be greater than 0".into()));
        }
        if self.output_size == 0 {
            return Err(SignalError::Config("Output size must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Rule and indicator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub momentum_threshold_pct: f64,
    pub strong_momentum_pct: f64,
    pub summary_dominance: f64,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub level_window: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let rules = RuleSettings::default();
        let calculator = CalculatorConfig::default();
        Self {
            momentum_threshold_pct: rules.momentum_threshold_pct,
            strong_momentum_pct: rules.strong_momentum_pct,
            summary_dominance: rules.summary_dominance,
            sma_fast: calculator.sma_fast,
            sma_slow: calculator.sma_slow,
            level_window: calculator.level_window,
        }
    }
}

impl RulesConfig {
    pub fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            momentum_threshold_pct: self.momentum_threshold_pct,
            strong_momentum_pct: self.strong_momentum_pct,
            summary_dominance: self.summary_dominance,
        }
    }

    pub fn calculator(&self) -> CalculatorConfig {
        CalculatorConfig {
            sma_fast: self.sma_fast,
            sma_slow: self.sma_slow,
            level_window: self.level_window,
        }
    }

    fn validate(&self) -> Result<(), SignalError> {
        self.rule_settings().validate()?;
        self.calculator()
            .validate()
            .map_err(|e| SignalError::Config(e.to_string()))
    }
}

/// Settings for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub enabled: bool,
    /// Override of the adapter's default endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Attach a live quote to fetched history, where supported
    pub include_quote: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            api_key_env: None,
            include_quote: false,
        }
    }
}

impl ProviderSettings {
    fn keyed(var: &str) -> Self {
        Self {
            api_key_env: Some(var.to_string()),
            ..Self::default()
        }
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub tradingview: ProviderSettings,
    pub alphavantage: ProviderSettings,
    pub twelvedata: ProviderSettings,
    pub truefx: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            tradingview: ProviderSettings::default(),
            alphavantage: ProviderSettings::keyed("ALPHA_VANTAGE_API_KEY"),
            twelvedata: ProviderSettings::keyed("TWELVE_DATA_API_KEY"),
            truefx: ProviderSettings::default(),
        }
    }
}

impl ProvidersConfig {
    /// Settings for a provider.
    pub fn get(&self, id: ProviderId) -> &ProviderSettings {
        match id {
            ProviderId::TradingView => &self.tradingview,
            ProviderId::AlphaVantage => &self.alphavantage,
            ProviderId::TwelveData => &self.twelvedata,
            ProviderId::TrueFx => &self.truefx,
        }
    }

    /// Enabled providers in iteration order.
    pub fn enabled(&self) -> Vec<ProviderId> {
        ProviderId::all()
            .iter()
            .copied()
            .filter(|id| self.get(*id).enabled)
            .collect()
    }
}
