//! Core types shared by the rate provider, the engine and the history store

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Three-letter currency code as reported by the rate service
pub type CurrencyCode = String;

/// Rate mapping: code -> units of that currency per one unit of the base currency
pub type CurrencyRates = HashMap<CurrencyCode, f64>;

/// Locally logged-in user. At most one is stored at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

impl User {
    /// Create a new user
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// One completed conversion, stored in the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub id: String,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    pub date: Timestamp,
}

impl Conversion {
    /// Package a quote into a history record
    pub fn new(
        id: impl Into<String>,
        from: impl Into<CurrencyCode>,
        to: impl Into<CurrencyCode>,
        amount: f64,
        quote: ConversionQuote,
        date: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            amount,
            result: quote.result,
            rate: quote.rate,
            date,
        }
    }

    /// True when amount, result and rate are all finite
    ///
    /// JSON has no encoding for infinities or NaN, so only finite records can be stored.
    pub fn is_finite(&self) -> bool {
        self.amount.is_finite() && self.result.is_finite() && self.rate.is_finite()
    }
}

/// Result of a single rate lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    /// Base currency the rates are expressed against
    pub base: CurrencyCode,
    pub rates: CurrencyRates,
    /// Provider-reported update time, or fetch time when the provider omits it
    pub last_updated: Timestamp,
}

impl RateSnapshot {
    /// Create a new snapshot
    pub fn new(
        base: impl Into<CurrencyCode>,
        rates: CurrencyRates,
        last_updated: Timestamp,
    ) -> Self {
        Self {
            base: base.into(),
            rates,
            last_updated,
        }
    }

    /// Rate for `code`, if the provider reported one
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Currency codes in alphabetical order
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

/// Output of the conversion engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionQuote {
    pub result: f64,
    pub rate: f64,
}
