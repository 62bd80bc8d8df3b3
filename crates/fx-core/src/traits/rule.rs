//! Signal rule trait definitions.

use crate::error::RuleError;
use crate::types::{IndicatorSnapshot, ProviderData, Signal};

/// A provider-specific decision procedure.
///
/// Implementations are pure: the same data and indicators always produce
/// the same signal. A rule that is handed a data shape it does not
/// understand returns [`RuleError::UnsupportedInput`] instead of guessing.
pub trait SignalRule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &str;

    /// Evaluate the rule.
    ///
    /// # Arguments
    /// * `data` - Normalized provider output
    /// * `indicators` - Indicators computed from the series in `data`
    ///   (all absent when `data` carries no series)
    fn evaluate(
        &self,
        data: &ProviderData,
        indicators: &IndicatorSnapshot,
    ) -> Result<Signal, RuleError>;

    /// Get a description of the rule.
    fn description(&self) -> &str {
        ""
    }

    /// Shorthand for the unsupported-input error.
    fn unsupported(&self, data: &ProviderData) -> RuleError {
        RuleError::UnsupportedInput {
            rule: self.name().to_string(),
            input: data.kind().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quote, Recommendation};

    struct AlwaysNeutral;

    impl SignalRule for AlwaysNeutral {
        fn name(&self) -> &str {
            "always-neutral"
        }

        fn evaluate(
            &self,
            data: &ProviderData,
            _indicators: &IndicatorSnapshot,
        ) -> Result<Signal, RuleError> {
            match data {
                ProviderData::Quote(_) => Ok(Signal::neutral()),
                other => Err(self.unsupported(other)),
            }
        }
    }

    #[test]
    fn test_unsupported_input_names_rule_and_kind() {
        let rule = AlwaysNeutral;
        let snapshot = IndicatorSnapshot::default();

        let ok = rule
            .evaluate(&ProviderData::Quote(Quote::rate(1.0, 0)), &snapshot)
            .unwrap();
        assert_eq!(ok.recommendation, Recommendation::Neutral);

        let err = rule
            .evaluate(
                &ProviderData::Sessions {
                    date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                },
                &snapshot,
            )
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::UnsupportedInput {
                rule: "always-neutral".into(),
                input: "sessions".into()
            }
        );
    }
}
