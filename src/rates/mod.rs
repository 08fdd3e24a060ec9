//! Exchange-rate providers
//!
//! - **exchange_rate_api**: live rates from the ExchangeRate-API free endpoint
//! - **in_memory**: fixed rate table for offline use and tests
//!
//! Providers are stateless from the caller's point of view: every call to
//! [`RateProvider::fetch_rates`] is an independent lookup. Nothing is cached
//! and concurrent calls for the same base are not merged.

pub mod exchange_rate_api;
pub mod in_memory;

pub use exchange_rate_api::{ExchangeRateApiProvider, DEFAULT_RATES_URL};
pub use in_memory::InMemoryRateProvider;

use crate::error::Result;
use crate::types::RateSnapshot;
use std::future::Future;

/// Source of exchange rates for a base currency
pub trait RateProvider: Send + Sync {
    /// Fetch the current rate mapping for `base`
    ///
    /// Any failure is reported as [`crate::error::FxError::RatesUnavailable`].
    fn fetch_rates(&self, base: &str) -> impl Future<Output = Result<RateSnapshot>> + Send;

    /// Get the provider name
    fn name(&self) -> &str;
}

impl<P: RateProvider> RateProvider for std::sync::Arc<P> {
    fn fetch_rates(&self, base: &str) -> impl Future<Output = Result<RateSnapshot>> + Send {
        (**self).fetch_rates(base)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
