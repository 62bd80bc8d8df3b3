//! Concurrent consensus engine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{ProviderId, Signal, SignalError, SignalRequest, SourceOutcome};
use fx_indicators::IndicatorCalculator;
use fx_rules::RuleRegistry;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{aggregate, ConsensusReport};

/// Which provider endpoint a pipeline reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Price history, summary or sessions
    #[default]
    History,
    /// Current quote only
    Snapshot,
}

/// Runs one fetch → indicators → rule pipeline per provider and
/// aggregates the outcomes.
///
/// Pipelines run concurrently on the calling task. Each is bounded by the
/// per-provider timeout, and a failure or timeout only marks that provider
/// as failed. Dropping the future returned by [`ConsensusEngine::run`]
/// cancels every in-flight provider call.
#[derive(Clone)]
pub struct ConsensusEngine {
    providers: Vec<Arc<dyn Provider>>,
    registry: RuleRegistry,
    calculator: IndicatorCalculator,
    timeout: Duration,
}

impl ConsensusEngine {
    /// Default per-provider timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create an engine with no providers.
    pub fn new(registry: RuleRegistry, calculator: IndicatorCalculator) -> Self {
        Self {
            providers: Vec::new(),
            registry,
            calculator,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Add a provider.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Set the per-provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ids of the registered providers.
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Get the rule registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every provider and aggregate.
    pub async fn run(&self, request: &SignalRequest) -> ConsensusReport {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            pair = %request.pair,
            interval = %request.interval,
            providers = self.providers.len(),
            "Running consensus"
        );

        let pipelines = self.providers.iter().map(|provider| async move {
            let outcome = match self.evaluate(provider.as_ref(), request, FetchMode::History).await {
                Ok(signal) => SourceOutcome::from(signal),
                Err(e) => {
                    warn!(%request_id, provider = %provider.id(), "Source failed: {}", e);
                    SourceOutcome::failed(e)
                }
            };
            (provider.id(), outcome)
        });

        let per_source: BTreeMap<_, _> = join_all(pipelines).await.into_iter().collect();
        let consensus = aggregate(per_source);

        info!(
            %request_id,
            recommendation = %consensus.overall_recommendation,
            agreement = %consensus.agreement_level,
            sources = consensus.total_sources,
            "Consensus complete"
        );

        ConsensusReport::new(request_id, request, consensus)
    }

    /// Run a single registered provider.
    pub async fn source(
        &self,
        id: ProviderId,
        request: &SignalRequest,
        mode: FetchMode,
    ) -> Result<Signal, SignalError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| SignalError::Config(format!("Provider {} is not enabled", id)))?;
        self.evaluate(provider.as_ref(), request, mode).await
    }

    /// One provider's pipeline, bounded by the timeout.
    pub async fn evaluate(
        &self,
        provider: &dyn Provider,
        request: &SignalRequest,
        mode: FetchMode,
    ) -> Result<Signal, SignalError> {
        match tokio::time::timeout(self.timeout, self.pipeline(provider, request, mode)).await {
            Ok(result) => result,
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                Err(ProviderError::Timeout(millis).into())
            }
        }
    }

    async fn pipeline(
        &self,
        provider: &dyn Provider,
        request: &SignalRequest,
        mode: FetchMode,
    ) -> Result<Signal, SignalError> {
        let data = match mode {
            FetchMode::History => provider.fetch(request).await?,
            FetchMode::Snapshot => provider.snapshot(request).await?,
        };
        debug!(provider = %provider.id(), kind = data.kind(), "Fetched");

        let indicators = data
            .series()
            .map(|series| self.calculator.compute(series))
            .unwrap_or_default();
        debug!(provider = %provider.id(), ?indicators, "Indicators computed");

        let rule = self.registry.select(provider.id(), &data);
        let signal = rule.evaluate(&data, &indicators)?;
        debug!(
            provider = %provider.id(),
            rule = rule.name(),
            recommendation = %signal.recommendation,
            confidence = %signal.confidence,
            "Signal derived"
        );

        Ok(signal)
    }
}

impl std::fmt::Debug for ConsensusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsensusEngine")
            .field("providers", &self.provider_ids())
            .field("registry", &self.registry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use fx_core::{
        AgreementLevel, Confidence, Interval, PricePoint, PriceSeries, ProviderData,
        Recommendation, TechnicalSummary,
    };
    use std::time::Instant;

    struct StaticProvider {
        id: ProviderId,
        data: Result<ProviderData, ProviderError>,
        delay: Duration,
    }

    impl StaticProvider {
        fn new(id: ProviderId, data: Result<ProviderData, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                id,
                data,
                delay: Duration::ZERO,
            })
        }

        fn delayed(
            id: ProviderId,
            data: Result<ProviderData, ProviderError>,
            delay: Duration,
        ) -> Arc<Self> {
            Arc::new(Self { id, data, delay })
        }
    }

    #[async_trait]
    impl Provider for StaticProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn fetch(&self, _request: &SignalRequest) -> Result<ProviderData, ProviderError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.data.clone()
        }
    }

    fn request() -> SignalRequest {
        SignalRequest::new(
            "EURUSD".parse().unwrap(),
            Interval::Minute15,
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap(),
        )
    }

    fn rising_series() -> ProviderData {
        let points: PriceSeries = (0..60)
            .map(|i| {
                let c = 1.0 + i as f64 * 0.002;
                PricePoint::new(i * 900_000, c, c, c, c)
            })
            .collect();
        ProviderData::Series {
            points,
            quote: None,
        }
    }

    fn summary() -> ProviderData {
        ProviderData::Summary(TechnicalSummary {
            recommendation: "STRONG_BUY".into(),
            buy: 10,
            sell: 2,
            neutral: 5,
            indicators: Default::default(),
        })
    }

    fn engine() -> ConsensusEngine {
        ConsensusEngine::new(RuleRegistry::default(), IndicatorCalculator::default())
    }

    #[tokio::test]
    async fn test_run_all_sources() {
        let engine = engine()
            .with_provider(StaticProvider::new(ProviderId::TradingView, Ok(summary())))
            .with_provider(StaticProvider::new(
                ProviderId::AlphaVantage,
                Err(ProviderError::RateLimited(ProviderId::AlphaVantage)),
            ))
            .with_provider(StaticProvider::new(ProviderId::TwelveData, Ok(rising_series())))
            .with_provider(StaticProvider::new(
                ProviderId::TrueFx,
                Ok(ProviderData::Sessions {
                    date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                }),
            ));

        let report = engine.run(&request()).await;
        let consensus = &report.consensus;

        assert_eq!(report.symbol, "EURUSD");
        assert_eq!(consensus.per_source.len(), 4);
        assert_eq!(consensus.total_sources, 3);
        assert_eq!(consensus.votes.buy, 2);
        assert_eq!(consensus.votes.neutral, 1);
        assert_eq!(consensus.overall_recommendation, Recommendation::Buy);
        assert_eq!(consensus.agreement_level, AgreementLevel::ModerateAgreement);
        assert_eq!(consensus.average_confidence, Confidence::High);
        assert_eq!(consensus.failed_sources(), vec![ProviderId::AlphaVantage]);

        let error = consensus.per_source[&ProviderId::AlphaVantage].error().unwrap();
        assert!(error.contains("Rate limit"));

        let twelve = consensus.per_source[&ProviderId::TwelveData].signal().unwrap();
        assert_eq!(twelve.recommendation, Recommendation::Buy);
        assert_eq!(twelve.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_timeout_marks_source_failed() {
        let engine = engine()
            .with_timeout(Duration::from_millis(50))
            .with_provider(StaticProvider::delayed(
                ProviderId::TwelveData,
                Ok(rising_series()),
                Duration::from_secs(5),
            ))
            .with_provider(StaticProvider::new(ProviderId::TradingView, Ok(summary())));

        let report = engine.run(&request()).await;

        assert_eq!(report.consensus.total_sources, 1);
        assert_eq!(report.consensus.agreement_level, AgreementLevel::SingleSource);
        let error = report.consensus.per_source[&ProviderId::TwelveData]
            .error()
            .unwrap();
        assert!(error.contains("Timed out after 50 ms"));
    }

    #[tokio::test]
    async fn test_providers_run_concurrently() {
        let delay = Duration::from_millis(200);
        let engine = engine()
            .with_provider(StaticProvider::delayed(ProviderId::TradingView, Ok(summary()), delay))
            .with_provider(StaticProvider::delayed(
                ProviderId::TwelveData,
                Ok(rising_series()),
                delay,
            ))
            .with_provider(StaticProvider::delayed(
                ProviderId::AlphaVantage,
                Ok(rising_series()),
                delay,
            ));

        let started = Instant::now();
        let report = engine.run(&request()).await;

        assert_eq!(report.consensus.total_sources, 3);
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_no_providers_is_no_data() {
        let report = engine().run(&request()).await;

        assert_eq!(report.consensus.total_sources, 0);
        assert_eq!(report.consensus.agreement_level, AgreementLevel::NoData);
        assert_eq!(report.consensus.overall_recommendation, Recommendation::Neutral);
    }

    #[tokio::test]
    async fn test_rule_error_is_source_failure() {
        // A summary handed to a series rule
        let engine = engine().with_provider(StaticProvider::new(ProviderId::TwelveData, Ok(summary())));
        let report = engine.run(&request()).await;

        let error = report.consensus.per_source[&ProviderId::TwelveData]
            .error()
            .unwrap();
        assert!(error.contains("Confluence"));
    }

    #[tokio::test]
    async fn test_source_lookup() {
        let engine = engine().with_provider(StaticProvider::new(ProviderId::TradingView, Ok(summary())));

        let signal = engine
            .source(ProviderId::TradingView, &request(), FetchMode::History)
            .await
            .unwrap();
        assert_eq!(signal.recommendation, Recommendation::Buy);

        let err = engine
            .source(ProviderId::TrueFx, &request(), FetchMode::History)
            .await
            .unwrap_err();
        assert!(matches!(err, SignalError::Config(_)));

        // No snapshot endpoint
        let err = engine
            .source(ProviderId::TradingView, &request(), FetchMode::Snapshot)
            .await
            .unwrap_err();
        assert!(matches!(err, SignalError::Provider(ProviderError::NoData)));
    }

    #[tokio::test]
    async fn test_identical_inputs_identical_signals() {
        let engine = engine().with_provider(StaticProvider::new(ProviderId::AlphaVantage, Ok(rising_series())));

        let first = engine.run(&request()).await;
        let second = engine.run(&request()).await;

        assert_ne!(first.request_id, second.request_id);
        assert_eq!(first.consensus, second.consensus);
    }
}
