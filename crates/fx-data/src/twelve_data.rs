//! Twelve Data adapter.

use async_trait::async_trait;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{CurrencyPair, Interval, PricePoint, PriceSeries, ProviderData, ProviderId, Quote, SignalRequest};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{api_key_from_env, send_json, HttpSettings};
use crate::parse::{parse_price, parse_timestamp};

/// Twelve Data configuration.
#[derive(Debug, Clone)]
pub struct TwelveDataConfig {
    pub base_url: String,
    pub api_key: String,
    /// Default number of bars requested
    pub output_size: usize,
    /// Also request `/quote` and attach it to the series
    pub include_quote: bool,
}

impl TwelveDataConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twelvedata.com";
    /// API ceiling for `outputsize`
    pub const MAX_OUTPUT_SIZE: usize = 5000;

    /// Load the key from an environment variable.
    pub fn from_env(base_url: Option<String>, key_var: &str) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            api_key: api_key_from_env(key_var, "demo"),
            output_size: 100,
            include_quote: false,
        }
    }
}

/// Body shared by every endpoint; `status: "error"` replaces the payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    values: Vec<Bar>,
}

#[derive(Debug, Deserialize)]
struct Bar {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    close: String,
    #[serde(default)]
    previous_close: Option<String>,
    #[serde(default)]
    percent_change: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Twelve Data provider.
pub struct TwelveDataProvider {
    config: TwelveDataConfig,
    client: Client,
}

impl TwelveDataProvider {
    /// Create a new Twelve Data client.
    pub fn new(config: TwelveDataConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            config,
            client: http.client()?,
        })
    }

    fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::Minute1 => "1min",
            Interval::Minute5 => "5min",
            Interval::Minute15 => "15min",
            Interval::Minute30 => "30min",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Daily => "1day",
        }
    }

    /// Bars for a pair, oldest first.
    pub async fn time_series(
        &self,
        pair: &CurrencyPair,
        interval: Interval,
        output_size: usize,
    ) -> Result<PriceSeries, ProviderError> {
        let size = output_size.clamp(1, TwelveDataConfig::MAX_OUTPUT_SIZE).to_string();
        let request = self
            .client
            .get(format!("{}/time_series", self.config.base_url))
            .query(&[
                ("symbol", pair.slashed().as_str()),
                ("interval", Self::interval_param(interval)),
                ("outputsize", size.as_str()),
                ("format", "json"),
                ("apikey", self.config.api_key.as_str()),
            ]);
        let body: Envelope<TimeSeries> = send_json(ProviderId::TwelveData, request).await?;
        parse_time_series(body)
    }

    /// Latest quote for a pair.
    pub async fn quote(&self, pair: &CurrencyPair) -> Result<Quote, ProviderError> {
        let request = self
            .client
            .get(format!("{}/quote", self.config.base_url))
            .query(&[
                ("symbol", pair.slashed().as_str()),
                ("apikey", self.config.api_key.as_str()),
            ]);
        let body: Envelope<QuoteBody> = send_json(ProviderId::TwelveData, request).await?;
        parse_quote(body)
    }
}

#[async_trait]
impl Provider for TwelveDataProvider {
    fn id(&self) -> ProviderId {
        ProviderId::TwelveData
    }

    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        let size = request.output_size.unwrap_or(self.config.output_size);
        debug!("Fetching time_series {} {} x{}", request.pair, request.interval, size);

        if !self.config.include_quote {
            let points = self.time_series(&request.pair, request.interval, size).await?;
            return Ok(ProviderData::Series {
                points,
                quote: None,
            });
        }

        let (points, quote) = tokio::join!(
            self.time_series(&request.pair, request.interval, size),
            self.quote(&request.pair)
        );
        let quote = match quote {
            Ok(quote) => Some(quote),
            Err(e) => {
                debug!("Quote unavailable for {}: {}", request.pair, e);
                None
            }
        };

        Ok(ProviderData::Series {
            points: points?,
            quote,
        })
    }

    async fn snapshot(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        self.quote(&request.pair).await.map(ProviderData::Quote)
    }
}

fn check_status<T>(envelope: Envelope<T>) -> Result<T, ProviderError> {
    if envelope.status.as_deref() == Some("error") {
        let message = envelope.message.unwrap_or_else(|| "Unknown error".into());
        return Err(match envelope.code {
            Some(429) => ProviderError::RateLimited(ProviderId::TwelveData),
            _ => ProviderError::Api(message),
        });
    }
    envelope
        .payload
        .ok_or_else(|| ProviderError::Parse("Unexpected response format".into()))
}

/// Newest-first `values` into a chronological series.
fn parse_time_series(envelope: Envelope<TimeSeries>) -> Result<PriceSeries, ProviderError> {
    let series = check_status(envelope)?;
    if series.values.is_empty() {
        return Err(ProviderError::NoData);
    }

    let points = series
        .values
        .iter()
        .map(|bar| {
            Ok(PricePoint::new(
                parse_timestamp(&bar.datetime)?,
                parse_price("open", &bar.open)?,
                parse_price("high", &bar.high)?,
                parse_price("low", &bar.low)?,
                parse_price("close", &bar.close)?,
            ))
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(PriceSeries::from_points(points))
}

fn parse_quote(envelope: Envelope<QuoteBody>) -> Result<Quote, ProviderError> {
    let body = check_status(envelope)?;
    let optional = |field: &str, value: Option<&str>| value.map(|v| parse_price(field, v)).transpose();

    Ok(Quote {
        close: parse_price("close", &body.close)?,
        previous_close: optional("previous_close", body.previous_close.as_deref())?,
        percent_change: optional("percent_change", body.percent_change.as_deref())?,
        timestamp: body.timestamp.map(|ts| ts * 1000).unwrap_or(0),
    })
}
