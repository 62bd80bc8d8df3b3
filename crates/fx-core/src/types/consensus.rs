//! Consensus result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Confidence, ProviderId, Recommendation, SourceOutcome};

/// Vote tally per recommendation category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    #[serde(rename = "BUY")]
    pub buy: usize,
    #[serde(rename = "SELL")]
    pub sell: usize,
    #[serde(rename = "NEUTRAL")]
    pub neutral: usize,
}

impl Votes {
    /// Count one vote.
    pub fn record(&mut self, recommendation: Recommendation) {
        match recommendation {
            Recommendation::Buy => self.buy += 1,
            Recommendation::Sell => self.sell += 1,
            Recommendation::Neutral => self.neutral += 1,
        }
    }

    /// Votes for one category.
    pub fn get(&self, recommendation: Recommendation) -> usize {
        match recommendation {
            Recommendation::Buy => self.buy,
            Recommendation::Sell => self.sell,
            Recommendation::Neutral => self.neutral,
        }
    }

    /// Total votes cast.
    pub fn total(&self) -> usize {
        self.buy + self.sell + self.neutral
    }
}

/// How strongly the sources agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementLevel {
    StrongAgreement,
    ModerateAgreement,
    MixedSignals,
    SingleSource,
    NoData,
}

impl fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgreementLevel::StrongAgreement => "STRONG_AGREEMENT",
            AgreementLevel::ModerateAgreement => "MODERATE_AGREEMENT",
            AgreementLevel::MixedSignals => "MIXED_SIGNALS",
            AgreementLevel::SingleSource => "SINGLE_SOURCE",
            AgreementLevel::NoData => "NO_DATA",
        };
        write!(f, "{}", s)
    }
}

/// Consensus over one request's per-source outcomes.
///
/// Rebuilt for every request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub overall_recommendation: Recommendation,
    pub votes: Votes,
    /// Successful sources only
    pub total_sources: usize,
    /// Share of successful sources voting for the overall recommendation
    pub agreement_ratio: f64,
    pub average_confidence: Confidence,
    pub agreement_level: AgreementLevel,
    pub per_source: BTreeMap<ProviderId, SourceOutcome>,
    pub summary: String,
}

impl ConsensusResult {
    /// Providers that failed, in iteration order.
    pub fn failed_sources(&self) -> Vec<ProviderId> {
        self.per_source
            .iter()
            .filter(|(_, outcome)| outcome.error().is_some())
            .map(|(id, _)| *id)
            .collect()
    }
}
