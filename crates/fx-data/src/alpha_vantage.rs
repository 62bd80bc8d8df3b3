//! Alpha Vantage adapter.
//!
//! History comes from `FX_INTRADAY`, snapshots from
//! `CURRENCY_EXCHANGE_RATE`. The free tier answers throttled calls with a
//! 200 and a `Note`/`Information` body, which maps to a rate-limit error.

use std::collections::HashMap;

use async_trait::async_trait;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{CurrencyPair, Interval, PricePoint, PriceSeries, ProviderData, ProviderId, Quote, SignalRequest};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http::{api_key_from_env, send_json, HttpSettings};
use crate::parse::{parse_price, parse_timestamp, tail};

/// Alpha Vantage configuration.
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    pub api_key: String,
}

impl AlphaVantageConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co/query";

    /// Load the key from an environment variable, falling back to the
    /// public `demo` key.
    pub fn from_env(base_url: Option<String>, key_var: &str) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            api_key: api_key_from_env(key_var, "demo"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntradayBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate")]
    rate: String,
    #[serde(rename = "6. Last Refreshed", default)]
    last_refreshed: Option<String>,
}

/// Alpha Vantage provider.
pub struct AlphaVantageProvider {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage client.
    pub fn new(config: AlphaVantageConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            config,
            client: http.client()?,
        })
    }

    /// `FX_INTRADAY` interval name; 4-hour and daily bars are not offered.
    fn interval_param(interval: Interval) -> Result<&'static str, ProviderError> {
        match interval {
            Interval::Minute1 => Ok("1min"),
            Interval::Minute5 => Ok("5min"),
            Interval::Minute15 => Ok("15min"),
            Interval::Minute30 => Ok("30min"),
            Interval::Hour1 => Ok("60min"),
            Interval::Hour4 | Interval::Daily => Err(ProviderError::UnsupportedInterval {
                provider: ProviderId::AlphaVantage,
                interval: interval.to_string(),
            }),
        }
    }

    /// Current exchange rate for a pair.
    pub async fn exchange_rate(&self, pair: &CurrencyPair) -> Result<Quote, ProviderError> {
        let request = self.client.get(&self.config.base_url).query(&[
            ("function", "CURRENCY_EXCHANGE_RATE"),
            ("from_currency", pair.base()),
            ("to_currency", pair.quote()),
            ("apikey", self.config.api_key.as_str()),
        ]);
        let body: Value = send_json(ProviderId::AlphaVantage, request).await?;
        parse_exchange_rate(&body)
    }
}

#[async_trait]
impl Provider for AlphaVantageProvider {
    fn id(&self) -> ProviderId {
        ProviderId::AlphaVantage
    }

    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        let interval = Self::interval_param(request.interval)?;
        let output_size = match request.output_size {
            Some(n) if n > 100 => "full",
            _ => "compact",
        };

        debug!("Fetching FX_INTRADAY {} {}", request.pair, interval);
        let http = self.client.get(&self.config.base_url).query(&[
            ("function", "FX_INTRADAY"),
            ("from_symbol", request.pair.base()),
            ("to_symbol", request.pair.quote()),
            ("interval", interval),
            ("outputsize", output_size),
            ("apikey", self.config.api_key.as_str()),
        ]);
        let body: Value = send_json(self.id(), http).await?;
        let points = tail(parse_intraday(&body, interval)?, request.output_size);

        Ok(ProviderData::Series {
            points,
            quote: None,
        })
    }

    async fn snapshot(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        self.exchange_rate(&request.pair).await.map(ProviderData::Quote)
    }
}

/// Map in-band error bodies to errors.
fn check_errors(body: &Value) -> Result<(), ProviderError> {
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(ProviderError::Api(message.to_string()));
    }
    if body.get("Note").is_some() || body.get("Information").is_some() {
        return Err(ProviderError::RateLimited(ProviderId::AlphaVantage));
    }
    Ok(())
}

/// Parse an `FX_INTRADAY` response body.
pub(crate) fn parse_intraday(body: &Value, interval: &str) -> Result<PriceSeries, ProviderError> {
    check_errors(body)?;

    let key = format!("Time Series FX ({})", interval);
    let raw = body
        .get(&key)
        .ok_or_else(|| ProviderError::Parse(format!("Missing \"{}\"", key)))?;
    let bars: HashMap<String, IntradayBar> =
        serde_json::from_value(raw.clone()).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if bars.is_empty() {
        return Err(ProviderError::NoData);
    }

    let points = bars
        .iter()
        .map(|(ts, bar)| {
            Ok(PricePoint::new(
                parse_timestamp(ts)?,
                parse_price("open", &bar.open)?,
                parse_price("high", &bar.high)?,
                parse_price("low", &bar.low)?,
                parse_price("close", &bar.close)?,
            ))
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(PriceSeries::from_points(points))
}

/// Parse a `CURRENCY_EXCHANGE_RATE` response body.
pub(crate) fn parse_exchange_rate(body: &Value) -> Result<Quote, ProviderError> {
    check_errors(body)?;

    let raw = body
        .get("Realtime Currency Exchange Rate")
        .ok_or_else(|| ProviderError::Parse("Unexpected response format".into()))?;
    let rate: ExchangeRate =
        serde_json::from_value(raw.clone()).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let timestamp = match rate.last_refreshed.as_deref() {
        Some(ts) => parse_timestamp(ts)?,
        None => 0,
    };
    Ok(Quote::rate(parse_price("exchange rate", &rate.rate)?, timestamp))
}
