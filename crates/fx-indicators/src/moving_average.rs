//! Moving average indicators.

use fx_core::error::IndicatorError;
use fx_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".into(),
            ));
        }
        Ok(Self { period })
    }

    /// Infallible constructor for known-good periods; zero is raised to 1.
    pub(crate) fn with_period(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    /// Mean of exactly the last `period` values.
    fn latest(&self, data: &[f64]) -> Option<f64> {
        if data.len() < self.period {
            return None;
        }
        let window = &data[data.len() - self.period..];
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}
