//! Indicator snapshot shared by the calculator and the rules.

use serde::{Deserialize, Serialize};

/// Support/resistance band over a window of highs and lows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    /// Lowest low in the window
    pub support: f64,
    /// Highest high in the window
    pub resistance: f64,
}

impl PriceLevels {
    /// Midpoint of the band.
    pub fn midpoint(&self) -> f64 {
        (self.support + self.resistance) / 2.0
    }
}

/// Indicators derived from one price series.
///
/// Every field is optional: a series too short for an indicator leaves it
/// absent rather than filling in a partial-window value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub latest_close: Option<f64>,
    pub previous_close: Option<f64>,
    /// latest - previous
    pub price_change: Option<f64>,
    /// (latest - previous) / previous, as a fraction
    pub momentum: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub levels: Option<PriceLevels>,
}

impl IndicatorSnapshot {
    /// Momentum expressed in percent.
    pub fn change_percent(&self) -> Option<f64> {
        self.momentum.map(|m| m * 100.0)
    }
}
