//! TradingView scanner adapter.
//!
//! Posts a column query to the forex scanner and turns the aggregate
//! `Recommend.All` rating plus a handful of indicator readings into a
//! [`TechnicalSummary`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{Interval, ProviderData, ProviderId, Recommendation, SignalRequest, TechnicalSummary, Votes};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::http::{send_json, HttpSettings};

/// Columns requested from the scanner, without the interval suffix.
const COLUMNS: [&str; 9] = [
    "Recommend.All",
    "close",
    "RSI",
    "MACD.macd",
    "MACD.signal",
    "SMA20",
    "SMA50",
    "EMA20",
    "EMA50",
];

/// TradingView configuration.
#[derive(Debug, Clone)]
pub struct TradingViewConfig {
    pub base_url: String,
    /// Exchange prefix for tickers, e.g. `FX_IDC`
    pub exchange: String,
}

impl TradingViewConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://scanner.tradingview.com/forex/scan";
}

impl Default for TradingViewConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            exchange: "FX_IDC".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScanRequest {
    symbols: ScanSymbols,
    columns: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScanSymbols {
    tickers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    #[serde(default)]
    data: Vec<ScanRow>,
}

#[derive(Debug, Deserialize)]
struct ScanRow {
    #[serde(rename = "d")]
    values: Vec<Value>,
}

/// TradingView provider.
pub struct TradingViewProvider {
    config: TradingViewConfig,
    client: Client,
}

impl TradingViewProvider {
    /// Create a new scanner client.
    pub fn new(config: TradingViewConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            config,
            client: http.client()?,
        })
    }

    /// Column suffix selecting the timeframe; daily is the unsuffixed default.
    fn interval_suffix(interval: Interval) -> &'static str {
        match interval {
            Interval::Minute1 => "|1",
            Interval::Minute5 => "|5",
            Interval::Minute15 => "|15",
            Interval::Minute30 => "|30",
            Interval::Hour1 => "|60",
            Interval::Hour4 => "|240",
            Interval::Daily => "",
        }
    }
}

#[async_trait]
impl Provider for TradingViewProvider {
    fn id(&self) -> ProviderId {
        ProviderId::TradingView
    }

    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        let ticker = format!("{}:{}", self.config.exchange, request.pair.compact());
        let suffix = Self::interval_suffix(request.interval);
        let body = ScanRequest {
            symbols: ScanSymbols {
                tickers: vec![ticker.clone()],
            },
            columns: COLUMNS.iter().map(|c| format!("{}{}", c, suffix)).collect(),
        };

        debug!("Scanning {} ({})", ticker, request.interval);
        let http = self.client.post(&self.config.base_url).json(&body);
        let response: ScanResponse = send_json(self.id(), http).await?;

        let row = response.data.into_iter().next().ok_or_else(|| ProviderError::UnsupportedPair {
            provider: ProviderId::TradingView,
            pair: request.pair.slashed(),
        })?;
        parse_row(&row.values).map(ProviderData::Summary)
    }
}

/// Label for a `Recommend.All` rating in [-1, 1].
pub(crate) fn rating_label(rating: f64) -> &'static str {
    if rating < -0.5 {
        "STRONG_SELL"
    } else if rating < -0.1 {
        "SELL"
    } else if rating <= 0.1 {
        "NEUTRAL"
    } else if rating <= 0.5 {
        "BUY"
    } else {
        "STRONG_BUY"
    }
}

/// Build a summary from one scanner row, values in [`COLUMNS`] order.
pub(crate) fn parse_row(values: &[Value]) -> Result<TechnicalSummary, ProviderError> {
    let column = |i: usize| values.get(i).and_then(Value::as_f64);

    let rating = column(0).ok_or_else(|| ProviderError::Parse("Missing Recommend.All".into()))?;

    let mut indicators = BTreeMap::new();
    for (i, name) in COLUMNS.iter().enumerate() {
        if let Some(v) = column(i) {
            indicators.insert((*name).to_string(), v);
        }
    }

    let mut votes = Votes::default();
    let close = column(1);
    for i in 5..=8 {
        if let (Some(close), Some(ma)) = (close, column(i)) {
            votes.record(compare(close, ma));
        }
    }
    if let Some(rsi) = column(2) {
        votes.record(if rsi < 30.0 {
            Recommendation::Buy
        } else if rsi > 70.0 {
            Recommendation::Sell
        } else {
            Recommendation::Neutral
        });
    }
    if let (Some(macd), Some(signal)) = (column(3), column(4)) {
        votes.record(compare(macd, signal));
    }

    Ok(TechnicalSummary {
        recommendation: rating_label(rating).to_string(),
        buy: count(votes.buy),
        sell: count(votes.sell),
        neutral: count(votes.neutral),
        indicators,
    })
}

fn compare(value: f64, reference: f64) -> Recommendation {
    if value > reference {
        Recommendation::Buy
    } else if value < reference {
        Recommendation::Sell
    } else {
        Recommendation::Neutral
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
