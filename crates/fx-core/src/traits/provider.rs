//! Provider trait definitions.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{ProviderData, ProviderId, SignalRequest};

/// A source of raw market data for one provider.
///
/// Adapters own their transport. The engine only sees the normalized
/// [`ProviderData`] shape, with any series already in chronological order.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which provider this adapter speaks for.
    fn id(&self) -> ProviderId;

    /// Fetch data for one request.
    ///
    /// # Returns
    /// Normalized data, or an error the engine records as a missing source
    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError>;

    /// Fetch only the current quote.
    ///
    /// Providers without a snapshot endpoint report [`ProviderError::NoData`].
    async fn snapshot(&self, _request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        Err(ProviderError::NoData)
    }

    /// Get the adapter name.
    fn name(&self) -> &str {
        self.id().label()
    }
}
