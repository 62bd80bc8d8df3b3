//! Provider identifiers, requests and normalized provider output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{CurrencyPair, Interval, PriceSeries, Quote};

/// Signal data providers.
///
/// Declaration order is the fixed iteration order used in per-source
/// maps and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    TradingView,
    AlphaVantage,
    TwelveData,
    TrueFx,
}

impl ProviderId {
    /// All providers in iteration order.
    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::TradingView,
            ProviderId::AlphaVantage,
            ProviderId::TwelveData,
            ProviderId::TrueFx,
        ]
    }

    /// Stable lower-case key used in JSON and config.
    pub fn key(&self) -> &'static str {
        match self {
            ProviderId::TradingView => "tradingview",
            ProviderId::AlphaVantage => "alphavantage",
            ProviderId::TwelveData => "twelvedata",
            ProviderId::TrueFx => "truefx",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::TradingView => "TradingView",
            ProviderId::AlphaVantage => "Alpha Vantage",
            ProviderId::TwelveData => "Twelve Data",
            ProviderId::TrueFx => "TrueFX",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        ProviderId::all()
            .iter()
            .find(|id| id.key() == key)
            .copied()
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}

/// Pre-computed third-party technical analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    /// Provider's own label, e.g. `STRONG_BUY`
    pub recommendation: String,
    /// Indicators voting buy
    pub buy: u32,
    /// Indicators voting sell
    pub sell: u32,
    /// Indicators voting neutral
    pub neutral: u32,
    /// Raw indicator values reported alongside the summary
    #[serde(default)]
    pub indicators: BTreeMap<String, f64>,
}

/// Normalized output of a provider adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderData {
    /// Chronological history, optionally with the latest quote
    Series {
        points: PriceSeries,
        quote: Option<Quote>,
    },
    /// Current snapshot only
    Quote(Quote),
    /// Third-party analysis summary
    Summary(TechnicalSummary),
    /// Date-scoped session checkpoints with no market data behind them
    Sessions { date: NaiveDate },
}

impl ProviderData {
    /// Short name of the data shape, used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderData::Series { .. } => "series",
            ProviderData::Quote(_) => "quote",
            ProviderData::Summary(_) => "summary",
            ProviderData::Sessions { .. } => "sessions",
        }
    }

    /// The price series, if any.
    pub fn series(&self) -> Option<&PriceSeries> {
        match self {
            ProviderData::Series { points, .. } => Some(points),
            _ => None,
        }
    }

    /// The quote, from a snapshot or attached to a series.
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            ProviderData::Series { quote, .. } => quote.as_ref(),
            ProviderData::Quote(quote) => Some(quote),
            _ => None,
        }
    }
}

/// One signal request as seen by every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRequest {
    pub pair: CurrencyPair,
    pub interval: Interval,
    /// Upper bound on history length, when the provider supports it
    pub output_size: Option<usize>,
    /// Injected "now"; date-scoped endpoints derive their date from it
    pub as_of: DateTime<Utc>,
}

impl SignalRequest {
    /// Create a request with no output-size bound.
    pub fn new(pair: CurrencyPair, interval: Interval, as_of: DateTime<Utc>) -> Self {
        Self {
            pair,
            interval,
            output_size: None,
            as_of,
        }
    }

    /// Bound the history length.
    pub fn with_output_size(mut self, size: usize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Calendar date of `as_of` in UTC.
    pub fn date(&self) -> NaiveDate {
        self.as_of.date_naive()
    }
}
