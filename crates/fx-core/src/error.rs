//! Error types for the signal engine.

use thiserror::Error;

use crate::types::ProviderId;

/// Top-level signal engine error.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Provider adapter errors.
///
/// These never abort a consensus request; the aggregator records them as
/// a missing source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Pair {pair} is not available from {provider}")]
    UnsupportedPair { provider: ProviderId, pair: String },

    #[error("Interval {interval} is not supported by {provider}")]
    UnsupportedInterval {
        provider: ProviderId,
        interval: String,
    },

    #[error("Rate limit exceeded for {0}")]
    RateLimited(ProviderId),

    #[error("API error: {0}")]
    Api(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data available for the requested pair")]
    NoData,

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

/// Signal rule errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Rule {rule} cannot evaluate {input} data")]
    UnsupportedInput { rule: String, input: String },

    #[error("Invalid rule input: {0}")]
    InvalidInput(String),

    #[error("No data points to evaluate")]
    NoData,
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for signal engine operations.
pub type SignalResult<T> = Result<T, SignalError>;
