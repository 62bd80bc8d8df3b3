//! Momentum indicators.

use fx_core::traits::Indicator;

/// Rate of change over a lookback, as a fraction.
///
/// `(x[t] - x[t-n]) / x[t-n]`. Windows whose base value is not positive
/// are skipped, since the ratio is meaningless for them.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    lookback: usize,
}

impl RateOfChange {
    /// Create a new rate-of-change indicator.
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback: lookback.max(1),
        }
    }
}

impl Default for RateOfChange {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Indicator for RateOfChange {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.lookback {
            return vec![];
        }

        data.windows(self.lookback + 1)
            .filter_map(|w| {
                let base = w[0];
                let last = w[self.lookback];
                (base > 0.0).then(|| (last - base) / base)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.lookback + 1
    }

    fn name(&self) -> &str {
        "ROC"
    }

    fn latest(&self, data: &[f64]) -> Option<f64> {
        if data.len() <= self.lookback {
            return None;
        }
        let base = data[data.len() - 1 - self.lookback];
        let last = data[data.len() - 1];
        (base > 0.0).then(|| (last - base) / base)
    }
}

/// Latest one-period momentum of a close series.
///
/// Absent with fewer than two closes or a non-positive previous close.
pub fn price_momentum(closes: &[f64]) -> Option<f64> {
    RateOfChange::default().latest(closes)
}
