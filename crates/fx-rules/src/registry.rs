//! Provider-to-rule wiring.

use std::collections::BTreeMap;
use std::sync::Arc;

use fx_core::traits::SignalRule;
use fx_core::{ProviderData, ProviderId, SignalError};
use fx_indicators::CalculatorConfig;
use serde::{Deserialize, Serialize};

use crate::{
    ConfluenceConfig, ConfluenceRule, MomentumRule, MomentumThresholds, SessionRule, SummaryRule,
    TrendConfig, TrendRule,
};

/// Tunable rule parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Minimum |percent change| for a momentum vote
    pub momentum_threshold_pct: f64,
    /// |percent change| for a HIGH confidence momentum-only call
    pub strong_momentum_pct: f64,
    /// Buy/sell ratio for a HIGH confidence summary
    pub summary_dominance: f64,
}

impl Default for RuleSettings {
    fn default() -> Self {
        let thresholds = MomentumThresholds::default();
        Self {
            momentum_threshold_pct: thresholds.threshold_pct,
            strong_momentum_pct: thresholds.strong_pct,
            summary_dominance: 1.5,
        }
    }
}

impl RuleSettings {
    /// Momentum thresholds derived from the settings.
    pub fn thresholds(&self) -> MomentumThresholds {
        MomentumThresholds {
            threshold_pct: self.momentum_threshold_pct,
            strong_pct: self.strong_momentum_pct,
        }
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), SignalError> {
        self.thresholds().validate().map_err(SignalError::Config)?;
        if !(self.summary_dominance >= 1.0) {
            return Err(SignalError::Config(
                "Summary dominance ratio must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Information about a registered rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Provider the rule is bound to
    pub provider: ProviderId,
    /// Rule name
    pub rule: String,
    /// Rule description
    pub description: String,
}

/// Maps each provider to the rule that interprets its data.
///
/// Quote snapshots always go to the momentum rule, whichever provider
/// produced them.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: BTreeMap<ProviderId, Arc<dyn SignalRule>>,
    momentum: Arc<dyn SignalRule>,
}

impl RuleRegistry {
    /// Build the registry with the built-in provider rules.
    pub fn new(settings: &RuleSettings, calculator: &CalculatorConfig) -> Self {
        let thresholds = settings.thresholds();

        let mut rules: BTreeMap<ProviderId, Arc<dyn SignalRule>> = BTreeMap::new();
        rules.insert(
            ProviderId::TradingView,
            Arc::new(SummaryRule::new(settings.summary_dominance)),
        );
        rules.insert(
            ProviderId::AlphaVantage,
            Arc::new(TrendRule::new(TrendConfig {
                thresholds,
                sma_period: calculator.sma_fast,
            })),
        );
        rules.insert(
            ProviderId::TwelveData,
            Arc::new(ConfluenceRule::new(ConfluenceConfig {
                thresholds,
                fast_period: calculator.sma_fast,
                slow_period: calculator.sma_slow,
            })),
        );
        rules.insert(ProviderId::TrueFx, Arc::new(SessionRule::new()));

        Self {
            rules,
            momentum: Arc::new(MomentumRule::new(thresholds)),
        }
    }

    /// Replace the rule bound to a provider.
    pub fn with_rule(mut self, provider: ProviderId, rule: Arc<dyn SignalRule>) -> Self {
        self.rules.insert(provider, rule);
        self
    }

    /// Rule bound to a provider.
    pub fn get(&self, provider: ProviderId) -> Option<&dyn SignalRule> {
        self.rules.get(&provider).map(|rule| &**rule)
    }

    /// Rule that should interpret `data` from `provider`.
    pub fn select(&self, provider: ProviderId, data: &ProviderData) -> &dyn SignalRule {
        match data {
            ProviderData::Quote(_) => &*self.momentum,
            _ => self.get(provider).unwrap_or(&*self.momentum),
        }
    }

    /// List the provider bindings in provider order.
    pub fn list(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|(provider, rule)| RuleInfo {
                provider: *provider,
                rule: rule.name().to_string(),
                description: rule.description().to_string(),
            })
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(&RuleSettings::default(), &CalculatorConfig::default())
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(p, r)| (p.key(), r.name())))
            .finish()
    }
}
