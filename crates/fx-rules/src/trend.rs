//! Momentum plus single moving average rule.
//!
//! Votes on momentum and on the latest close against the fast SMA.
//! Agreement raises confidence; a conflict cancels out to NEUTRAL.

use fx_core::error::RuleError;
use fx_core::traits::SignalRule;
use fx_core::{Confidence, IndicatorSnapshot, ProviderData, Recommendation, Signal};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::momentum::{with_price_evidence, MomentumThresholds};

/// Configuration for the trend rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Momentum thresholds
    pub thresholds: MomentumThresholds,
    /// Period of the moving average the close is compared with
    pub sma_period: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            thresholds: MomentumThresholds::default(),
            sma_period: 20,
        }
    }
}

/// Momentum + single moving average rule.
#[derive(Debug, Clone, Default)]
pub struct TrendRule {
    config: TrendConfig,
}

impl TrendRule {
    /// Create a new trend rule.
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    fn sma_label(&self) -> String {
        format!("sma_{}", self.config.sma_period)
    }

    /// Close versus SMA; `None` when the SMA is missing or equal to the close.
    fn ma_vote(indicators: &IndicatorSnapshot) -> Option<Recommendation> {
        let close = indicators.latest_close?;
        let sma = indicators.sma_fast?;
        if close > sma {
            Some(Recommendation::Buy)
        } else if close < sma {
            Some(Recommendation::Sell)
        } else {
            None
        }
    }

    fn combine(momentum: Recommendation, ma: Option<Recommendation>) -> (Recommendation, Confidence) {
        use Recommendation::Neutral;

        match ma {
            None if momentum.is_directional() => (momentum, Confidence::Medium),
            None => (Neutral, Confidence::Low),
            Some(ma) if ma == momentum => (momentum, Confidence::High),
            Some(ma) if momentum == Neutral => (ma, Confidence::Medium),
            // opposite directions
            Some(_) => (Neutral, Confidence::Low),
        }
    }
}

impl SignalRule for TrendRule {
    fn name(&self) -> &str {
        "Trend"
    }

    fn description(&self) -> &str {
        "Momentum confirmed by the close against a single moving average"
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
        let ma = Self::ma_vote(indicators);
        let (recommendation, confidence) = Self::combine(momentum, ma);

        trace!(
            rule = self.name(),
            momentum = %momentum,
            ma = ?ma,
            result = %recommendation,
            "trend votes"
        );

        let mut signal = with_price_evidence(Signal::new(recommendation, confidence), indicators)
            .with_optional(&self.sma_label(), indicators.sma_fast);

        match momentum {
            Recommendation::Buy => signal = signal.with_reason("Positive price momentum"),
            Recommendation::Sell => signal = signal.with_reason("Negative price momentum"),
            Recommendation::Neutral => {}
        }
        match ma {
            Some(Recommendation::Buy) => {
                signal = signal.with_reason("Price above moving average")
            }
            Some(Recommendation::Sell) => {
                signal = signal.with_reason("Price below moving average")
            }
            _ => {}
        }

        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::{PricePoint, PriceSeries, Quote};
    use fx_indicators::IndicatorCalculator;

    fn series(closes: &[f64]) -> PriceSeries {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(i as i64 * 60_000, c, c, c, c))
            .collect()
    }

    fn evaluate(closes: &[f64]) -> Signal {
        let points = series(closes);
        let snapshot = IndicatorCalculator::default().compute(&points);
        TrendRule::default()
            .evaluate(&ProviderData::Series { points, quote: None }, &snapshot)
            .unwrap()
    }

    fn snapshot(pct: Option<f64>, close: f64, sma: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            latest_close: Some(close),
            momentum: pct.map(|p| p / 100.0),
            sma_fast: sma,
            ..Default::default()
        }
    }

    fn evaluate_snapshot(snapshot: &IndicatorSnapshot) -> Signal {
        let data = ProviderData::Series {
            points: series(&[1.0, 1.0]),
            quote: None,
        };
        TrendRule::default().evaluate(&data, snapshot).unwrap()
    }

    #[test]
    fn test_agreement_is_high_confidence() {
        let signal = evaluate_snapshot(&snapshot(Some(0.3), 1.10, Some(1.08)));
        assert_eq!(signal.recommendation, Recommendation::Buy);
        assert_eq!(signal.confidence, Confidence::High);
        assert_eq!(signal.indicator("sma_20"), Some(1.08));
        assert_eq!(signal.evidence.reasons.len(), 2);

        let signal = evaluate_snapshot(&snapshot(Some(-0.3), 1.05, Some(1.08)));
        assert_eq!(signal.recommendation, Recommendation::Sell);
        assert_eq!(signal.confidence, Confidence::High);
    }

    #[test]
    fn test_single_vote_is_medium() {
        let signal = evaluate_snapshot(&snapshot(Some(0.05), 1.10, Some(1.08)));
        assert_eq!(signal.recommendation, Recommendation::Buy);
        assert_eq!(signal.confidence, Confidence::Medium);

        let signal = evaluate_snapshot(&snapshot(Some(-0.2), 1.08, Some(1.08)));
        assert_eq!(signal.recommendation, Recommendation::Sell);
        assert_eq!(signal.confidence, Confidence::Medium);
    }

    #[test]
    fn test_conflict_is_neutral_low() {
        let signal = evaluate_snapshot(&snapshot(Some(0.3), 1.05, Some(1.08)));
        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert_eq!(signal.confidence, Confidence::Low);
    }

    #[test]
    fn test_missing_sma_uses_momentum_only() {
        let signal = evaluate_snapshot(&snapshot(Some(0.3), 1.10, None));
        assert_eq!(signal.recommendation, Recommendation::Buy);
        assert_eq!(signal.confidence, Confidence::Medium);
        assert!(signal.indicator("sma_20").is_none());

        let signal = evaluate_snapshot(&snapshot(Some(0.0), 1.10, None));
        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert_eq!(signal.confidence, Confidence::Low);
    }

    #[test]
    fn test_constant_closes_are_neutral() {
        let signal = evaluate(&[1.25; 30]);
        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert_eq!(signal.confidence, Confidence::Low);
    }

    #[test]
    fn test_rising_series_is_buy() {
        let closes: Vec<f64> = (0..30).map(|i| 1.0 + i as f64 * 0.01).collect();
        let signal = evaluate(&closes);
        assert_eq!(signal.recommendation, Recommendation::Buy);
        assert_eq!(signal.confidence, Confidence::High);
    }

    #[test]
    fn test_rejects_quotes_and_empty_series() {
        let rule = TrendRule::default();
        let snapshot = IndicatorSnapshot::default();

        let err = rule
            .evaluate(&ProviderData::Quote(Quote::rate(1.0, 0)), &snapshot)
            .unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedInput { .. }));

        let empty = ProviderData::Series {
            points: PriceSeries::default(),
            quote: None,
        };
        assert_eq!(rule.evaluate(&empty, &snapshot), Err(RuleError::NoData));
    }

    #[test]
    fn test_deterministic() {
        let closes: Vec<f64> = (0..40).map(|i| 1.1 + (i as f64 * 0.3).sin() * 0.01).collect();
        assert_eq!(evaluate(&closes), evaluate(&closes));
    }
}
