//! TrueFX adapter.
//!
//! TrueFX only publishes monthly tick archives, so this adapter performs
//! no network call. It validates the pair against the published list and
//! hands the session rule the request's date.

use async_trait::async_trait;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{CurrencyPair, ProviderData, ProviderId, SignalRequest};

/// Pairs with TrueFX tick archives.
pub const TRUEFX_PAIRS: [&str; 13] = [
    "AUD/JPY", "AUD/USD", "EUR/AUD", "EUR/CHF", "EUR/GBP", "EUR/JPY", "EUR/USD", "GBP/JPY",
    "GBP/USD", "NZD/USD", "USD/CAD", "USD/CHF", "USD/JPY",
];

/// TrueFX session provider.
#[derive(Debug, Clone, Default)]
pub struct TrueFxProvider;

impl TrueFxProvider {
    /// Create a new TrueFX provider.
    pub fn new() -> Self {
        Self
    }

    /// Check if a pair has tick data.
    pub fn supports(pair: &CurrencyPair) -> bool {
        TRUEFX_PAIRS.contains(&pair.slashed().as_str())
    }
}

#[async_trait]
impl Provider for TrueFxProvider {
    fn id(&self) -> ProviderId {
        ProviderId::TrueFx
    }

    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        if !Self::supports(&request.pair) {
            return Err(ProviderError::UnsupportedPair {
                provider: ProviderId::TrueFx,
                pair: request.pair.slashed(),
            });
        }
        Ok(ProviderData::Sessions {
            date: request.date(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use fx_core::Interval;

    fn request(symbol: &str) -> SignalRequest {
        SignalRequest::new(
            symbol.parse().unwrap(),
            Interval::Minute15,
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_sessions_use_request_date() {
        let data = TrueFxProvider::new().fetch(&request("EURUSD")).await.unwrap();
        assert_eq!(
            data,
            ProviderData::Sessions {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
            }
        );
    }

    #[tokio::test]
    async fn test_unlisted_pair() {
        let err = TrueFxProvider::new().fetch(&request("USDSEK")).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::UnsupportedPair {
                provider: ProviderId::TrueFx,
                pair: "USD/SEK".into()
            }
        );
    }

    #[test]
    fn test_supports() {
        assert!(TrueFxProvider::supports(&"gbp/jpy".parse().unwrap()));
        assert!(!TrueFxProvider::supports(&"EUR/SEK".parse().unwrap()));
    }
}
