//! Shared HTTP plumbing for the REST adapters.

use std::time::Duration;

use fx_core::error::ProviderError;
use fx_core::ProviderId;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("fxsignals/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpSettings {
    /// Build a client.
    pub(crate) fn client(&self) -> Result<Client, ProviderError> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| ProviderError::Connection(e.to_string()))
    }
}

/// Send a request and decode a JSON body.
///
/// 429 maps to [`ProviderError::RateLimited`]; any other non-success status
/// becomes an API error carrying the status and body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let resp = request
        .send()
        .await
        .map_err(|e| ProviderError::Connection(e.to_string()))?;

    let status = resp.status();
    debug!("{} responded {}", provider, status);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited(provider));
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Api(format!("{}: {}", status, text)));
    }

    resp.json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Resolve an API key from the environment.
pub(crate) fn api_key_from_env(var: &str, fallback: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
