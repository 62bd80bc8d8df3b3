//! Core data types for the signal engine.

mod consensus;
mod indicators;
mod interval;
mod pair;
mod price;
mod provider;
mod signal;

pub use consensus::{AgreementLevel, ConsensusResult, Votes};
pub use indicators::{IndicatorSnapshot, PriceLevels};
pub use interval::Interval;
pub use pair::CurrencyPair;
pub use price::{PricePoint, PriceSeries, Quote};
pub use provider::{ProviderData, ProviderId, SignalRequest, TechnicalSummary};
pub use signal::{Confidence, Evidence, Recommendation, Signal, SourceOutcome};
