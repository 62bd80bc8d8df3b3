//! Core traits for the signal engine.

mod indicator;
mod provider;
mod rule;

pub use indicator::Indicator;
pub use provider::Provider;
pub use rule::SignalRule;
