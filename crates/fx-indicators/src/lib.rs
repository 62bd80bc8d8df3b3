//! Technical indicators for forex signal derivation.
//!
//! This crate provides the indicators the signal rules consume:
//! - Simple moving average
//! - One-period momentum (rate of change)
//! - Support/resistance levels
//!
//! [`IndicatorCalculator`] bundles them into an
//! [`IndicatorSnapshot`](fx_core::IndicatorSnapshot) for one series.

pub mod calculator;
pub mod levels;
pub mod momentum;
pub mod moving_average;

pub use calculator::{CalculatorConfig, IndicatorCalculator};
pub use levels::price_levels;
pub use momentum::{price_momentum, RateOfChange};
pub use moving_average::Sma;
