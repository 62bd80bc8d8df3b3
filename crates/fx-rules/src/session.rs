//! Session placeholder rule.
//!
//! Emits a fixed NEUTRAL/MEDIUM signal at each trading-session checkpoint
//! of a date. Nothing here looks at market data, so every signal is
//! flagged synthetic.

use chrono::{NaiveDate, NaiveTime};
use fx_core::error::RuleError;
use fx_core::traits::SignalRule;
use fx_core::{Confidence, IndicatorSnapshot, ProviderData, Recommendation, Signal};
use serde::Serialize;

/// UTC hour and label of each session checkpoint, in time order.
pub const SESSION_CHECKPOINTS: [(u32, &str); 5] = [
    (0, "Asian session start"),
    (8, "European session start"),
    (13, "US session start"),
    (17, "US session peak"),
    (21, "Asian session preparation"),
];

/// One placeholder signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCheckpoint {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub session: &'static str,
    pub signal: Signal,
}

/// Synthetic session rule.
#[derive(Debug, Clone, Default)]
pub struct SessionRule;

impl SessionRule {
    /// Create a new session rule.
    pub fn new() -> Self {
        Self
    }

    /// All checkpoints for a date.
    pub fn checkpoints(&self, date: NaiveDate) -> Vec<SessionCheckpoint> {
        SESSION_CHECKPOINTS
            .iter()
            .filter_map(|&(hour, session)| {
                let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                Some(SessionCheckpoint {
                    date,
                    time,
                    session,
                    signal: Self::placeholder(session),
                })
            })
            .collect()
    }

    fn placeholder(session: &str) -> Signal {
        Signal::new(Recommendation::Neutral, Confidence::Medium)
            .with_note(format!(
                "Placeholder for {}; not derived from tick data",
                session
            ))
            .synthetic()
    }
}

impl SignalRule for SessionRule {
    fn name(&self) -> &str {
        "Session"
    }

    fn description(&self) -> &str {
        "Synthetic NEUTRAL/MEDIUM placeholders at fixed session times"
    }

    fn evaluate(
        &self,
        data: &ProviderData,
        _indicators: &IndicatorSnapshot,
    ) -> Result<Signal, RuleError> {
        match data {
            ProviderData::Sessions { date } => self
                .checkpoints(*date)
                .into_iter()
                .next()
                .map(|checkpoint| checkpoint.signal)
                .ok_or(RuleError::NoData),
            other => Err(self.unsupported(other)),
        }
    }
}
