//! Conversion engine

use crate::error::{FxError, Result};
use crate::rates::RateProvider;
use crate::types::{ConversionQuote, RateSnapshot};

/// Converts amounts using rates from a [`RateProvider`]
///
/// The engine does not validate its inputs: a non-positive amount or
/// `from == to` is converted like any other request. Callers that need those
/// guards use [`crate::app::ConversionRequest::validate`].
#[derive(Debug, Clone)]
pub struct ConversionEngine<P> {
    provider: P,
}

impl<P: RateProvider> ConversionEngine<P> {
    /// Create a new engine over `provider`
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying rate provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Convert `amount` units of `from` into `to`
    ///
    /// Fetches fresh rates with `from` as the base and returns
    /// `amount * rates[to]` at full precision. Fails with
    /// [`FxError::CurrencyNotFound`] when `to` has no usable rate; rate fetch
    /// errors are returned unchanged.
    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<ConversionQuote> {
        let snapshot = self.provider.fetch_rates(from).await?;
        let rate = lookup_rate(&snapshot, to)?;
        let result = amount * rate;

        log::debug!(
            "Converted {} {} -> {} {} (rate {}, via {})",
            amount,
            from,
            result,
            to,
            rate,
            self.provider.name()
        );

        Ok(ConversionQuote { result, rate })
    }

    /// Current rate mapping for `base`
    pub async fn rates(&self, base: &str) -> Result<RateSnapshot> {
        self.provider.fetch_rates(base).await
    }
}

/// A zero or non-finite rate counts as missing
fn lookup_rate(snapshot: &RateSnapshot, to: &str) -> Result<f64> {
    match snapshot.rate(to) {
        Some(rate) if rate != 0.0 && rate.is_finite() => Ok(rate),
        _ => Err(FxError::CurrencyNotFound(to.to_string())),
    }
}
