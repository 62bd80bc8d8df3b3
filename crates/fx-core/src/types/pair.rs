//! Currency pair identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SignalError;

/// A currency pair such as EUR/USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    /// Create a pair from two ISO currency codes.
    pub fn new(base: &str, quote: &str) -> Result<Self, SignalError> {
        let base = base.trim().to_uppercase();
        let quote = quote.trim().to_uppercase();
        if !is_currency_code(&base) || !is_currency_code(&quote) {
            return Err(SignalError::InvalidSymbol(format!("{}{}", base, quote)));
        }
        if base == quote {
            return Err(SignalError::InvalidSymbol(format!(
                "{}{}: base and quote must differ",
                base, quote
            )));
        }
        Ok(Self { base, quote })
    }

    /// Base currency code.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote currency code.
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Compact form, e.g. `EURUSD`.
    pub fn compact(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// Slash form, e.g. `EUR/USD`.
    pub fn slashed(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if let Some((base, quote)) = cleaned.split_once(['/', '_', '-']) {
            return Self::new(base, quote).map_err(|_| SignalError::InvalidSymbol(s.to_string()));
        }

        if cleaned.len() == 6 && cleaned.is_ascii() {
            return Self::new(&cleaned[..3], &cleaned[3..])
                .map_err(|_| SignalError::InvalidSymbol(s.to_string()));
        }

        Err(SignalError::InvalidSymbol(s.to_string()))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = SignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.compact()
    }
}
