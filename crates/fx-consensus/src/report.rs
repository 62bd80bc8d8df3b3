//! Consensus report returned by the engine.

use chrono::{DateTime, Utc};
use fx_core::{ConsensusResult, Interval, SignalRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed consensus request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// Unique id for correlating logs with output
    pub request_id: Uuid,
    /// Compact pair symbol, e.g. `EURUSD`
    pub symbol: String,
    pub interval: Interval,
    /// The request's injected time
    pub as_of: DateTime<Utc>,
    pub consensus: ConsensusResult,
}

impl ConsensusReport {
    /// Wrap a consensus result for a request.
    pub fn new(request_id: Uuid, request: &SignalRequest, consensus: ConsensusResult) -> Self {
        Self {
            request_id,
            symbol: request.pair.compact(),
            interval: request.interval,
            as_of: request.as_of,
            consensus,
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
