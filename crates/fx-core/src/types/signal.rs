//! Normalized trading signals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Direction of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Neutral,
}

impl Recommendation {
    /// All categories in tally order.
    pub fn all() -> [Recommendation; 3] {
        [Recommendation::Buy, Recommendation::Sell, Recommendation::Neutral]
    }

    /// Check if this is a directional call.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Recommendation::Neutral)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Neutral => "NEUTRAL",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Recommendation {
    type Err = String;

    /// Accepts plain and graded labels (`STRONG_BUY` folds into BUY).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "BUY" | "STRONG_BUY" => Ok(Recommendation::Buy),
            "SELL" | "STRONG_SELL" => Ok(Recommendation::Sell),
            "NEUTRAL" | "HOLD" => Ok(Recommendation::Neutral),
            _ => Err(format!("Invalid recommendation: {}", s)),
        }
    }
}

/// Confidence attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Numeric score used for averaging (LOW=1, MEDIUM=2, HIGH=3).
    pub fn score(&self) -> u8 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }

    /// Map a mean score back to a level.
    ///
    /// Rounds half up and clamps to [1, 3]; non-finite input is LOW.
    pub fn from_mean(mean: f64) -> Self {
        if !mean.is_finite() {
            return Confidence::Low;
        }
        let rounded = (mean + 0.5).floor().clamp(1.0, 3.0);
        match rounded as u8 {
            3 => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

/// Supporting data for a signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Named numeric inputs (e.g. `price_change_percent`, `sma_20`)
    #[serde(default)]
    pub indicators: BTreeMap<String, f64>,
    /// Human-readable reasons, in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Set when the signal is a placeholder not derived from market data
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

/// A normalized per-provider signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    #[serde(default)]
    pub evidence: Evidence,
}

impl Signal {
    /// Create a signal with empty evidence.
    pub fn new(recommendation: Recommendation, confidence: Confidence) -> Self {
        Self {
            recommendation,
            confidence,
            evidence: Evidence::default(),
        }
    }

    /// NEUTRAL with LOW confidence.
    pub fn neutral() -> Self {
        Self::new(Recommendation::Neutral, Confidence::Low)
    }

    /// Record a numeric input.
    pub fn with_indicator(mut self, name: &str, value: f64) -> Self {
        self.evidence.indicators.insert(name.to_string(), value);
        self
    }

    /// Record a numeric input when present.
    pub fn with_optional(self, name: &str, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.with_indicator(name, v),
            None => self,
        }
    }

    /// Append a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.evidence.reasons.push(reason.into());
        self
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.evidence.note = Some(note.into());
        self
    }

    /// Mark as synthetic.
    pub fn synthetic(mut self) -> Self {
        self.evidence.synthetic = true;
        self
    }

    /// Look up a numeric input.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.evidence.indicators.get(name).copied()
    }
}

/// What one provider contributed to a consensus request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceOutcome {
    Signal(Signal),
    Failed { error: String },
}

impl SourceOutcome {
    /// Error marker from anything displayable.
    pub fn failed(reason: impl fmt::Display) -> Self {
        SourceOutcome::Failed {
            error: reason.to_string(),
        }
    }

    /// The signal, if the source succeeded.
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            SourceOutcome::Signal(signal) => Some(signal),
            SourceOutcome::Failed { .. } => None,
        }
    }

    /// The failure reason, if the source failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            SourceOutcome::Signal(_) => None,
            SourceOutcome::Failed { error } => Some(error),
        }
    }
}

impl From<Signal> for SourceOutcome {
    fn from(signal: Signal) -> Self {
        SourceOutcome::Signal(signal)
    }
}
