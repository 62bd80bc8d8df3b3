//! Third-party technical summary rule.

use fx_core::error::RuleError;
use fx_core::traits::SignalRule;
use fx_core::{Confidence, IndicatorSnapshot, ProviderData, Recommendation, Signal, TechnicalSummary};

/// Maps a provider's own summary label and indicator tallies to a signal.
///
/// `STRONG_BUY`/`STRONG_SELL` fold into BUY/SELL. Confidence is HIGH when
/// one side outnumbers the other by more than `dominance`, else MEDIUM.
#[derive(Debug, Clone)]
pub struct SummaryRule {
    dominance: f64,
}

impl Default for SummaryRule {
    fn default() -> Self {
        Self { dominance: 1.5 }
    }
}

impl SummaryRule {
    /// Create a summary rule with a custom dominance ratio.
    pub fn new(dominance: f64) -> Self {
        Self { dominance }
    }

    fn confidence(&self, summary: &TechnicalSummary) -> Confidence {
        let buy = f64::from(summary.buy);
        let sell = f64::from(summary.sell);
        if buy > self.dominance * sell || sell > self.dominance * buy {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

impl SignalRule for SummaryRule {
    fn name(&self) -> &str {
        "Summary"
    }

    fn description(&self) -> &str {
        "Provider's own technical rating, confidence from buy/sell indicator balance"
    }

    fn evaluate(
        &self,
        data: &ProviderData,
        _indicators: &IndicatorSnapshot,
    ) -> Result<Signal, RuleError> {
        let summary = match data {
            ProviderData::Summary(summary) => summary,
            other => return Err(self.unsupported(other)),
        };

        let recommendation: Recommendation = summary
            .recommendation
            .parse()
            .map_err(RuleError::InvalidInput)?;

        let mut signal = Signal::new(recommendation, self.confidence(summary))
            .with_indicator("buy_signals", f64::from(summary.buy))
            .with_indicator("sell_signals", f64::from(summary.sell))
            .with_indicator("neutral_signals", f64::from(summary.neutral))
            .with_note(format!("Summary rating: {}", summary.recommendation));

        for (name, value) in &summary.indicators {
            signal = signal.with_indicator(name, *value);
        }

        Ok(signal)
    }
}
