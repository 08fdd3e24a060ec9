//! In-memory rate provider
//!
//! Serves rates from a fixed table quoted against an anchor currency. Rates
//! for any other base present in the table are derived by cross-rate:
//! `rate(base -> x) = table[x] / table[base]`.

use super::RateProvider;
use crate::error::{FxError, Result};
use crate::types::{CurrencyRates, RateSnapshot, Timestamp};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Fixed-table rate provider
///
/// # Example
/// ```
/// use rusty_fx::rates::{InMemoryRateProvider, RateProvider};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let provider = InMemoryRateProvider::new("USD")
///     .with_rate("EUR", 0.9)
///     .with_rate("GBP", 0.75);
///
/// let snapshot = provider.fetch_rates("EUR").await.unwrap();
/// assert!((snapshot.rate("GBP").unwrap() - 0.75 / 0.9).abs() < 1e-12);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryRateProvider {
    /// Rates against the anchor currency
    table: Arc<RwLock<CurrencyRates>>,
    /// Fixed update time reported with every snapshot
    last_updated: Option<Timestamp>,
    requests: Arc<AtomicUsize>,
}

impl InMemoryRateProvider {
    /// Create an empty table quoted against `anchor`
    pub fn new(anchor: impl Into<String>) -> Self {
        let anchor = anchor.into().to_uppercase();
        let mut table = CurrencyRates::new();
        table.insert(anchor, 1.0);

        Self {
            table: Arc::new(RwLock::new(table)),
            last_updated: None,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Builder-style variant of [`set_rate`](Self::set_rate)
    pub fn with_rate(self, code: &str, rate: f64) -> Self {
        self.set_rate(code, rate);
        self
    }

    /// Report a fixed update time instead of the fetch time
    pub fn with_last_updated(mut self, last_updated: Timestamp) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    /// Insert or replace the rate of `code` against the anchor
    ///
    /// Non-positive rates are stored as given; the engine treats them as missing.
    pub fn set_rate(&self, code: &str, rate: f64) {
        let mut table = match self.table.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        table.insert(code.to_uppercase(), rate);
    }

    /// Number of lookups served so far (failed ones included)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn snapshot(&self, base: &str) -> Result<RateSnapshot> {
        let table = match self.table.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let base_rate = table
            .get(base)
            .copied()
            .filter(|r| *r > 0.0 && r.is_finite())
            .ok_or_else(|| FxError::rates_unavailable(base, "base currency not in rate table"))?;

        let rates: CurrencyRates = table
            .iter()
            .map(|(code, rate)| (code.clone(), rate / base_rate))
            .collect();

        Ok(RateSnapshot::new(
            base,
            rates,
            self.last_updated.unwrap_or_else(Utc::now),
        ))
    }
}

impl RateProvider for InMemoryRateProvider {
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.snapshot(base)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn provider() -> InMemoryRateProvider {
        InMemoryRateProvider::new("USD")
            .with_rate("EUR", 0.9)
            .with_rate("JPY", 150.0)
    }

    #[tokio::test]
    async fn test_anchor_rates_returned_as_is() {
        let snapshot = provider().fetch_rates("USD").await.unwrap();
        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.9));
        assert_eq!(snapshot.rate("USD"), Some(1.0));
    }

    #[tokio::test]
    async fn test_cross_rates() {
        let snapshot = provider().fetch_rates("EUR").await.unwrap();
        assert_relative_eq!(snapshot.rate("EUR").unwrap(), 1.0);
        assert_relative_eq!(snapshot.rate("USD").unwrap(), 1.0 / 0.9);
        assert_relative_eq!(snapshot.rate("JPY").unwrap(), 150.0 / 0.9);
    }

    #[tokio::test]
    async fn test_unknown_base_is_unavailable() {
        let err = provider().fetch_rates("XYZ").await.unwrap_err();
        assert!(matches!(err, FxError::RatesUnavailable { ref base, .. } if base == "XYZ"));
    }

    #[tokio::test]
    async fn test_every_lookup_is_counted() {
        let provider = provider();
        let _ = provider.fetch_rates("USD").await;
        let _ = provider.fetch_rates("USD").await;
        let _ = provider.fetch_rates("XYZ").await;
        assert_eq!(provider.request_count(), 3);
    }

    #[tokio::test]
    async fn test_fixed_update_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let provider = provider().with_last_updated(at);

        assert_eq!(provider.fetch_rates("USD").await.unwrap().last_updated, at);
        assert_eq!(provider.fetch_rates("JPY").await.unwrap().last_updated, at);
    }

    #[tokio::test]
    async fn test_rates_can_change_between_lookups() {
        let provider = provider();
        let clone = provider.clone();
        clone.set_rate("EUR", 0.95);

        let snapshot = provider.fetch_rates("USD").await.unwrap();
        assert_eq!(snapshot.rate("EUR"), Some(0.95));
    }
}
