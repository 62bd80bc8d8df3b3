//! Confluence rule: momentum, dual moving-average alignment and the
//! support/resistance midpoint each cast one vote; the majority wins.

use fx_core::error::RuleError;
use fx_core::traits::SignalRule;
use fx_core::{Confidence, IndicatorSnapshot, ProviderData, Recommendation, Signal, Votes};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::momentum::{with_price_evidence, MomentumThresholds};

/// Configuration for the confluence rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceConfig {
    /// Momentum thresholds
    pub thresholds: MomentumThresholds,
    /// Fast SMA period (evidence label only)
    pub fast_period: usize,
    /// Slow SMA period (evidence label only)
    pub slow_period: usize,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            thresholds: MomentumThresholds::default(),
            fast_period: 20,
            slow_period: 50,
        }
    }
}

/// Three-vote confluence rule.
#[derive(Debug, Clone, Default)]
pub struct ConfluenceRule {
    config: ConfluenceConfig,
}

impl ConfluenceRule {
    /// Create a new confluence rule.
    pub fn new(config: ConfluenceConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ConfluenceConfig {
        &self.config
    }

    fn alignment_vote(indicators: &IndicatorSnapshot) -> Recommendation {
        match (indicators.latest_close, indicators.sma_fast, indicators.sma_slow) {
            (Some(close), Some(fast), Some(slow)) if close > fast && fast > slow => {
                Recommendation::Buy
            }
            (Some(close), Some(fast), Some(slow)) if close < fast && fast < slow => {
                Recommendation::Sell
            }
            _ => Recommendation::Neutral,
        }
    }

    fn level_vote(indicators: &IndicatorSnapshot) -> Recommendation {
        match (indicators.latest_close, indicators.levels) {
            (Some(close), Some(levels)) if close > levels.midpoint() => Recommendation::Buy,
            _ => Recommendation::Neutral,
        }
    }

    /// Majority of the votes and the confidence implied by the largest bloc.
    fn resolve(votes: &[Recommendation]) -> (Recommendation, Confidence) {
        let mut tally = Votes::default();
        for vote in votes {
            tally.record(*vote);
        }

        let recommendation = Recommendation::all()
            .into_iter()
            .find(|r| tally.get(*r) >= 2)
            .unwrap_or(Recommendation::Neutral);

        let largest = Recommendation::all()
            .into_iter()
            .map(|r| tally.get(r))
            .max()
            .unwrap_or(0);
        let confidence = match largest {
            3 => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        };

        (recommendation, confidence)
    }
}

impl SignalRule for ConfluenceRule {
    fn name(&self) -> &str {
        "Confluence"
    }

    fn description(&self) -> &str {
        "Majority of momentum, SMA alignment and support/resistance votes"
    }

    fn evaluate(
        &self,
        data: &ProviderData,
        indicators: &IndicatorSnapshot,
    ) -> Result<Signal, RuleError> {
        let series = match data {
            ProviderData::Series { points, .. } => points,
            other => return Err(self.unsupported(other)),
        };
        if series.is_empty() {
            return Err(RuleError::NoData);
        }

        let momentum = self.config.thresholds.vote_opt(indicators.change_percent());
        let alignment = Self::alignment_vote(indicators);
        let level = Self::level_vote(indicators);
        let (recommendation, confidence) = Self::resolve(&[momentum, alignment, level]);

        trace!(
            rule = self.name(),
            momentum = %momentum,
            alignment = %alignment,
            level = %level,
            result = %recommendation,
            "confluence votes"
        );

        let mut signal = with_price_evidence(Signal::new(recommendation, confidence), indicators)
            .with_optional(&format!("sma_{}", self.config.fast_period), indicators.sma_fast)
            .with_optional(&format!("sma_{}", self.config.slow_period), indicators.sma_slow);

        if let Some(levels) = indicators.levels {
            signal = signal
                .with_indicator("support", levels.support)
                .with_indicator("resistance", levels.resistance)
                .with_indicator("midpoint", levels.midpoint());
        }

        match momentum {
            Recommendation::Buy => signal = signal.with_reason("Positive price momentum"),
            Recommendation::Sell => signal = signal.with_reason("Negative price momentum"),
            Recommendation::Neutral => {}
        }
        match alignment {
            Recommendation::Buy => {
                signal = signal.with_reason("Price above both moving averages (bullish)")
            }
            Recommendation::Sell => {
                signal = signal.with_reason("Price below both moving averages (bearish)")
            }
            Recommendation::Neutral => {}
        }
        if level == Recommendation::Buy {
            signal = signal.with_reason("Price above midpoint of support/resistance range");
        }

        Ok(signal)
    }
}
