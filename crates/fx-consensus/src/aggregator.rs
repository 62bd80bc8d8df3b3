//! Vote tallying and agreement classification.

use std::collections::BTreeMap;

use fx_core::{
    AgreementLevel, Confidence, ConsensusResult, ProviderId, Recommendation, SourceOutcome, Votes,
};

/// Combine per-provider outcomes into one consensus.
///
/// Failed sources stay in `per_source` but cast no vote. The overall
/// recommendation is a strict plurality; any tie for the top count
/// resolves to NEUTRAL, and the agreement ratio is measured against the
/// resolved recommendation.
pub fn aggregate(per_source: BTreeMap<ProviderId, SourceOutcome>) -> ConsensusResult {
    let signals: Vec<_> = per_source.values().filter_map(SourceOutcome::signal).collect();

    let mut votes = Votes::default();
    for signal in &signals {
        votes.record(signal.recommendation);
    }
    let total_sources = signals.len();

    let overall_recommendation = plurality(&votes);
    let agreement_ratio = if total_sources == 0 {
        0.0
    } else {
        votes.get(overall_recommendation) as f64 / total_sources as f64
    };

    let average_confidence = if total_sources == 0 {
        Confidence::Low
    } else {
        let sum: u32 = signals.iter().map(|s| u32::from(s.confidence.score())).sum();
        Confidence::from_mean(f64::from(sum) / total_sources as f64)
    };

    let agreement_level = agreement_level(total_sources, agreement_ratio);

    let mut result = ConsensusResult {
        overall_recommendation,
        votes,
        total_sources,
        agreement_ratio,
        average_confidence,
        agreement_level,
        per_source,
        summary: String::new(),
    };
    result.summary = summarize(&result);
    result
}

/// The category with strictly more votes than each other, else NEUTRAL.
fn plurality(votes: &Votes) -> Recommendation {
    Recommendation::all()
        .into_iter()
        .find(|candidate| {
            Recommendation::all()
                .into_iter()
                .filter(|other| other != candidate)
                .all(|other| votes.get(*candidate) > votes.get(other))
        })
        .unwrap_or(Recommendation::Neutral)
}

/// Classify agreement from the number of successful sources and the ratio.
pub fn agreement_level(total_sources: usize, ratio: f64) -> AgreementLevel {
    match total_sources {
        0 => AgreementLevel::NoData,
        1 => AgreementLevel::SingleSource,
        _ if ratio >= 0.75 => AgreementLevel::StrongAgreement,
        _ if ratio >= 0.5 => AgreementLevel::ModerateAgreement,
        _ => AgreementLevel::MixedSignals,
    }
}

/// One-line human-readable summary.
///
/// Lists successful providers in [`ProviderId`] order.
pub fn summarize(result: &ConsensusResult) -> String {
    let mut parts = vec![
        format!("Consensus Recommendation: {}", result.overall_recommendation),
        format!("Agreement Level: {}", result.agreement_level),
        format!(
            "Votes - BUY: {}, SELL: {}, NEUTRAL: {}",
            result.votes.buy, result.votes.sell, result.votes.neutral
        ),
        format!("Average Confidence: {}", result.average_confidence),
    ];

    for (provider, outcome) in &result.per_source {
        if let Some(signal) = outcome.signal() {
            parts.push(format!("{}: {}", provider.label(), signal.recommendation));
        }
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::Signal;

    fn outcomes(signals: &[(ProviderId, Recommendation, Confidence)]) -> BTreeMap<ProviderId, SourceOutcome> {
        signals
            .iter()
            .map(|(id, rec, conf)| (*id, SourceOutcome::from(Signal::new(*rec, *conf))))
            .collect()
    }

    use Confidence::{High, Low, Medium};
    use ProviderId::{AlphaVantage, TradingView, TrueFx, TwelveData};
    use Recommendation::{Buy, Neutral, Sell};

    #[test]
    fn test_strong_agreement() {
        let result = aggregate(outcomes(&[
            (TradingView, Buy, High),
            (AlphaVantage, Buy, Medium),
            (TwelveData, Buy, Medium),
            (TrueFx, Neutral, Medium),
        ]));

        assert_eq!(result.overall_recommendation, Buy);
        assert_eq!(result.votes, Votes { buy: 3, sell: 0, neutral: 1 });
        assert_eq!(result.total_sources, 4);
        assert!((result.agreement_ratio - 0.75).abs() < 1e-10);
        assert_eq!(result.agreement_level, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn test_tie_resolves_to_neutral() {
        let result = aggregate(outcomes(&[
            (TradingView, Buy, High),
            (AlphaVantage, Buy, High),
            (TwelveData, Sell, High),
            (TrueFx, Sell, High),
        ]));

        assert_eq!(result.overall_recommendation, Neutral);
        assert_eq!(result.agreement_ratio, 0.0);
        assert_eq!(result.agreement_level, AgreementLevel::MixedSignals);
    }

    #[test]
    fn test_moderate_agreement() {
        let result = aggregate(outcomes(&[
            (TradingView, Sell, Medium),
            (AlphaVantage, Sell, Medium),
            (TwelveData, Buy, Medium),
        ]));

        assert_eq!(result.overall_recommendation, Sell);
        assert_eq!(result.agreement_level, AgreementLevel::ModerateAgreement);
    }

    #[test]
    fn test_half_agreement_is_moderate() {
        let result = aggregate(outcomes(&[
            (TradingView, Buy, Medium),
            (AlphaVantage, Buy, Medium),
            (TwelveData, Sell, Medium),
            (TrueFx, Neutral, Medium),
        ]));

        assert_eq!(result.overall_recommendation, Buy);
        assert_eq!(result.agreement_ratio, 0.5);
        assert_eq!(result.agreement_level, AgreementLevel::ModerateAgreement);
    }

    #[test]
    fn test_single_source() {
        let result = aggregate(outcomes(&[(TwelveData, Sell, Low)]));

        assert_eq!(result.overall_recommendation, Sell);
        assert_eq!(result.total_sources, 1);
        assert_eq!(result.agreement_level, AgreementLevel::SingleSource);
    }

    #[test]
    fn test_no_sources() {
        let mut per_source = BTreeMap::new();
        per_source.insert(TradingView, SourceOutcome::failed("Connection error: refused"));
        per_source.insert(AlphaVantage, SourceOutcome::failed("Rate limit exceeded"));

        let result = aggregate(per_source);

        assert_eq!(result.total_sources, 0);
        assert_eq!(result.overall_recommendation, Neutral);
        assert_eq!(result.agreement_level, AgreementLevel::NoData);
        assert_eq!(result.average_confidence, Low);
        assert_eq!(result.agreement_ratio, 0.0);
        assert_eq!(result.failed_sources(), vec![TradingView, AlphaVantage]);
    }

    #[test]
    fn test_failures_cast_no_vote() {
        let mut per_source = outcomes(&[(TradingView, Buy, High), (TwelveData, Buy, High)]);
        per_source.insert(AlphaVantage, SourceOutcome::failed("Timed out after 10000 ms"));

        let result = aggregate(per_source);

        assert_eq!(result.total_sources, 2);
        assert_eq!(result.votes.total(), 2);
        assert_eq!(result.per_source.len(), 3);
        assert_eq!(result.agreement_level, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn test_average_confidence_rounds() {
        let result = aggregate(outcomes(&[
            (TradingView, Buy, High),
            (AlphaVantage, Buy, High),
            (TwelveData, Buy, Low),
        ]));
        // (3 + 3 + 1) / 3 = 2.33
        assert_eq!(result.average_confidence, Medium);

        let result = aggregate(outcomes(&[(TradingView, Buy, High), (AlphaVantage, Buy, Medium)]));
        // 2.5 rounds up
        assert_eq!(result.average_confidence, High);

        let result = aggregate(outcomes(&[(TradingView, Buy, Low), (AlphaVantage, Buy, Medium)]));
        assert_eq!(result.average_confidence, Medium);
    }

    #[test]
    fn test_summary_format() {
        let mut per_source = outcomes(&[
            (TrueFx, Neutral, Medium),
            (TradingView, Buy, High),
            (TwelveData, Buy, Medium),
        ]);
        per_source.insert(AlphaVantage, SourceOutcome::failed("API error"));

        let result = aggregate(per_source);

        assert_eq!(
            result.summary,
            "Consensus Recommendation: BUY | Agreement Level: MODERATE_AGREEMENT | \
             Votes - BUY: 2, SELL: 0, NEUTRAL: 1 | Average Confidence: MEDIUM | \
             TradingView: BUY | Twelve Data: BUY | TrueFX: NEUTRAL"
        );
    }

    #[test]
    fn test_deterministic() {
        let input = outcomes(&[(TradingView, Buy, High), (TwelveData, Sell, Low)]);
        assert_eq!(aggregate(input.clone()), aggregate(input));
    }

    #[test]
    fn test_json_shape() {
        let result = aggregate(outcomes(&[(TradingView, Buy, High)]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["overall_recommendation"], "BUY");
        assert_eq!(json["agreement_level"], "SINGLE_SOURCE");
        assert_eq!(json["average_confidence"], "HIGH");
        assert_eq!(json["votes"]["BUY"], 1);
        assert_eq!(json["per_source"]["tradingview"]["recommendation"], "BUY");
    }
}
