//! Interval definitions for provider queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SignalError;

/// Granularity of the data a provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 1 minute
    #[serde(rename = "1min")]
    Minute1,
    /// 5 minutes
    #[serde(rename = "5min")]
    Minute5,
    /// 15 minutes
    #[serde(rename = "15min")]
    #[default]
    Minute15,
    /// 30 minutes
    #[serde(rename = "30min")]
    Minute30,
    /// 1 hour
    #[serde(rename = "1hour")]
    Hour1,
    /// 4 hours
    #[serde(rename = "4hour")]
    Hour4,
    /// 1 day
    #[serde(rename = "1day")]
    Daily,
}

impl Interval {
    /// Get the duration of the interval in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Interval::Minute1 => 60,
            Interval::Minute5 => 300,
            Interval::Minute15 => 900,
            Interval::Minute30 => 1800,
            Interval::Hour1 => 3600,
            Interval::Hour4 => 14400,
            Interval::Daily => 86400,
        }
    }

    /// Check if this is an intraday interval.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Interval::Daily)
    }

    /// Get all available intervals.
    pub fn all() -> &'static [Interval] {
        &[
            Interval::Minute1,
            Interval::Minute5,
            Interval::Minute15,
            Interval::Minute30,
            Interval::Hour1,
            Interval::Hour4,
            Interval::Daily,
        ]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interval::Minute1 => "1min",
            Interval::Minute5 => "5min",
            Interval::Minute15 => "15min",
            Interval::Minute30 => "30min",
            Interval::Hour1 => "1hour",
            Interval::Hour4 => "4hour",
            Interval::Daily => "1day",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Interval {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1min" | "1m" => Ok(Interval::Minute1),
            "5min" | "5m" => Ok(Interval::Minute5),
            "15min" | "15m" => Ok(Interval::Minute15),
            "30min" | "30m" => Ok(Interval::Minute30),
            "1hour" | "60min" | "1h" => Ok(Interval::Hour1),
            "4hour" | "4h" => Ok(Interval::Hour4),
            "1day" | "1d" | "daily" => Ok(Interval::Daily),
            _ => Err(SignalError::InvalidInterval(s.to_string())),
        }
    }
}
