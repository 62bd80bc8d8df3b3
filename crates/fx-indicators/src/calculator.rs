//! Indicator snapshot calculation.

use fx_core::error::IndicatorError;
use fx_core::traits::Indicator;
use fx_core::{IndicatorSnapshot, PriceSeries};
use serde::{Deserialize, Serialize};

use crate::{price_levels, price_momentum, Sma};

/// Calculator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Fast SMA period
    pub sma_fast: usize,
    /// Slow SMA period
    pub sma_slow: usize,
    /// Number of recent points used for support/resistance
    pub level_window: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            level_window: 20,
        }
    }
}

impl CalculatorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.sma_fast == 0 || self.level_window == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA and level window periods must be greater than 0".into(),
            ));
        }
        if self.sma_fast >= self.sma_slow {
            return Err(IndicatorError::InvalidParameter(
                "Fast SMA period must be less than slow SMA period".into(),
            ));
        }
        Ok(())
    }
}

/// Computes an [`IndicatorSnapshot`] from a chronological series.
///
/// Stateless; identical series always produce identical snapshots.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    config: CalculatorConfig,
    fast: Sma,
    slow: Sma,
}

impl IndicatorCalculator {
    /// Create a calculator from a validated configuration.
    pub fn new(config: CalculatorConfig) -> Result<Self, IndicatorError> {
        config.validate()?;
        Ok(Self {
            fast: Sma::new(config.sma_fast)?,
            slow: Sma::new(config.sma_slow)?,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Compute all indicators for a series.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let closes = series.closes();
        let latest_close = series.latest().map(|p| p.close);
        let previous_close = series.previous().map(|p| p.close);

        IndicatorSnapshot {
            latest_close,
            previous_close,
            price_change: latest_close.zip(previous_close).map(|(l, p)| l - p),
            momentum: price_momentum(&closes),
            sma_fast: self.fast.latest(&closes),
            sma_slow: self.slow.latest(&closes),
            levels: price_levels(series.points(), self.config.level_window),
        }
    }
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        let config = CalculatorConfig::default();
        Self {
            fast: Sma::with_period(config.sma_fast),
            slow: Sma::with_period(config.sma_slow),
            config,
        }
    }
}
