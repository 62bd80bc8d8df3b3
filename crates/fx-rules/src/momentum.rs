//! Momentum-only rule.
//!
//! Used when a provider only reports a current price against a previous
//! one. BUY above +threshold, SELL below -threshold, NEUTRAL otherwise.

use fx_core::error::RuleError;
use fx_core::traits::SignalRule;
use fx_core::{Confidence, IndicatorSnapshot, ProviderData, Quote, Recommendation, Signal};
use serde::{Deserialize, Serialize};

/// Percent-change thresholds shared by every momentum vote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumThresholds {
    /// Minimum |percent change| for a directional vote
    pub threshold_pct: f64,
    /// |percent change| above which a momentum-only call is HIGH confidence
    pub strong_pct: f64,
}

impl Default for MomentumThresholds {
    fn default() -> Self {
        Self {
            threshold_pct: 0.1,
            strong_pct: 0.5,
        }
    }
}

impl MomentumThresholds {
    /// Validate the thresholds.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.threshold_pct > 0.0) {
            return Err("Momentum threshold must be positive".into());
        }
        if self.strong_pct < self.threshold_pct {
            return Err("Strong momentum threshold must not be below the momentum threshold".into());
        }
        Ok(())
    }

    /// Direction of a percent change; exactly at the threshold is NEUTRAL.
    pub fn vote(&self, change_pct: f64) -> Recommendation {
        if change_pct > self.threshold_pct {
            Recommendation::Buy
        } else if change_pct < -self.threshold_pct {
            Recommendation::Sell
        } else {
            Recommendation::Neutral
        }
    }

    /// Vote for an optional percent change; absence is NEUTRAL.
    pub fn vote_opt(&self, change_pct: Option<f64>) -> Recommendation {
        change_pct.map_or(Recommendation::Neutral, |pct| self.vote(pct))
    }
}

/// Momentum-only rule.
#[derive(Debug, Clone, Default)]
pub struct MomentumRule {
    thresholds: MomentumThresholds,
}

impl MomentumRule {
    /// Create a new momentum rule.
    pub fn new(thresholds: MomentumThresholds) -> Self {
        Self { thresholds }
    }

    fn classify(&self, change_pct: f64) -> (Recommendation, Confidence) {
        let recommendation = self.thresholds.vote(change_pct);
        let confidence = if !recommendation.is_directional() {
            Confidence::Low
        } else if change_pct.abs() > self.thresholds.strong_pct {
            Confidence::High
        } else {
            Confidence::Medium
        };
        (recommendation, confidence)
    }
}

impl SignalRule for MomentumRule {
    fn name(&self) -> &str {
        "Momentum"
    }

    fn description(&self) -> &str {
        "BUY/SELL when the latest price change exceeds the momentum threshold"
    }

    fn evaluate(
        &self,
        data: &ProviderData,
        indicators: &IndicatorSnapshot,
    ) -> Result<Signal, RuleError> {
        let (change_pct, current, previous) = match data {
            ProviderData::Quote(quote) => {
                (quote.change_percent(), Some(quote.close), quote.previous_close)
            }
            ProviderData::Series { points, quote } => {
                if points.is_empty() && quote.is_none() {
                    return Err(RuleError::NoData);
                }
                let change = quote
                    .as_ref()
                    .and_then(Quote::change_percent)
                    .or_else(|| indicators.change_percent());
                (
                    change,
                    indicators.latest_close.or(quote.as_ref().map(|q| q.close)),
                    indicators.previous_close,
                )
            }
            other => return Err(self.unsupported(other)),
        };

        let signal = match change_pct {
            Some(pct) => {
                let (recommendation, confidence) = self.classify(pct);
                Signal::new(recommendation, confidence).with_indicator("price_change_percent", pct)
            }
            None => Signal::neutral()
                .with_note("No price change available; defaulting to NEUTRAL"),
        };

        Ok(signal
            .with_optional("current_price", current)
            .with_optional("previous_price", previous))
    }
}

/// Common price evidence for series-based rules.
pub(crate) fn with_price_evidence(signal: Signal, indicators: &IndicatorSnapshot) -> Signal {
    signal
        .with_optional("price_change", indicators.price_change)
        .with_optional("price_change_percent", indicators.change_percent())
        .with_optional("current_price", indicators.latest_close)
        .with_optional("previous_price", indicators.previous_close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::{PricePoint, PriceSeries};
    use fx_indicators::IndicatorCalculator;

    fn quote(pct: Option<f64>) -> ProviderData {
        ProviderData::Quote(Quote {
            close: 1.0850,
            previous_close: Some(1.0840),
            percent_change: pct,
            timestamp: 0,
        })
    }

    fn evaluate(data: &ProviderData) -> Signal {
        MomentumRule::default()
            .evaluate(data, &IndicatorSnapshot::default())
            .unwrap()
    }

    #[test]
    fn test_thresholds() {
        let cases = [
            (0.6, Recommendation::Buy, Confidence::High),
            (0.3, Recommendation::Buy, Confidence::Medium),
            (0.1, Recommendation::Neutral, Confidence::Low),
            (0.0, Recommendation::Neutral, Confidence::Low),
            (-0.1, Recommendation::Neutral, Confidence::Low),
            (-0.2, Recommendation::Sell, Confidence::Medium),
            (-0.51, Recommendation::Sell, Confidence::High),
        ];

        for (pct, rec, conf) in cases {
            let signal = evaluate(&quote(Some(pct)));
            assert_eq!(signal.recommendation, rec, "pct {pct}");
            assert_eq!(signal.confidence, conf, "pct {pct}");
            assert_eq!(signal.indicator("price_change_percent"), Some(pct));
        }
    }

    #[test]
    fn test_derives_change_from_previous_close() {
        // 1.0850 vs 1.0840 is ~0.092%: below threshold
        let signal = evaluate(&quote(None));
        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert!(signal.indicator("price_change_percent").is_some());
    }

    #[test]
    fn test_rate_only_quote_falls_back_to_neutral_low() {
        let signal = evaluate(&ProviderData::Quote(Quote::rate(1.0850, 0)));

        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert_eq!(signal.confidence, Confidence::Low);
        assert!(signal.evidence.note.is_some());
        assert_eq!(signal.indicator("current_price"), Some(1.0850));
    }

    #[test]
    fn test_constant_closes_are_neutral() {
        let points: PriceSeries = (0..30)
            .map(|i| PricePoint::new(i, 1.2, 1.2, 1.2, 1.2))
            .collect();
        let snapshot = IndicatorCalculator::default().compute(&points);
        let data = ProviderData::Series {
            points,
            quote: None,
        };

        let signal = MomentumRule::default().evaluate(&data, &snapshot).unwrap();
        assert_eq!(signal.recommendation, Recommendation::Neutral);
        assert_eq!(signal.indicator("price_change_percent"), Some(0.0));
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let data = ProviderData::Series {
            points: PriceSeries::default(),
            quote: None,
        };
        let result = MomentumRule::default().evaluate(&data, &IndicatorSnapshot::default());
        assert_eq!(result, Err(RuleError::NoData));
    }

    #[test]
    fn test_threshold_validation() {
        assert!(MomentumThresholds::default().validate().is_ok());
        let bad = MomentumThresholds {
            threshold_pct: 0.5,
            strong_pct: 0.1,
        };
        assert!(bad.validate().is_err());
    }
}
