//! Core types and traits for the forex signal consensus engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PricePoint, PriceSeries, Quote)
//! - Currency pairs, intervals and provider identifiers
//! - Signals, source outcomes and consensus results
//! - Core traits for indicators, signal rules and providers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{SignalError, SignalResult};
pub use traits::*;
pub use types::*;
