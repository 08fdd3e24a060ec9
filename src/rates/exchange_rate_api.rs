//! ExchangeRate-API data source
//!
//! Uses the free, key-less `v4/latest/<BASE>` endpoint. One HTTP request per
//! lookup, no retries.

use super::RateProvider;
use crate::error::{FxError, Result};
use crate::types::{CurrencyRates, RateSnapshot};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Free endpoint, no API key required
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Live rate provider backed by ExchangeRate-API
#[derive(Debug, Clone)]
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    base: Option<String>,
    rates: CurrencyRates,
    #[serde(default)]
    time_last_updated: Option<i64>,
}

impl ExchangeRateApiProvider {
    /// Create a provider for the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_RATES_URL, None)
    }

    /// Create a provider for a custom endpoint, with an optional request timeout
    pub fn with_base_url(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FxError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Endpoint root this provider queries
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, base: &str) -> std::result::Result<RateSnapshot, String> {
        let url = format!("{}/{}", self.base_url, base);
        log::debug!("Fetching exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("rate service returned {}", response.status()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        parse_latest_rates(&text, base, Utc::now())
    }
}

impl RateProvider for ExchangeRateApiProvider {
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        self.request(base).await.map_err(|reason| {
            log::warn!("Error fetching exchange rates for {}: {}", base, reason);
            FxError::rates_unavailable(base, reason)
        })
    }

    fn name(&self) -> &str {
        "exchangerate-api"
    }
}

/// Decode a `latest` response body.
///
/// A missing `base` falls back to the requested base; a missing or
/// out-of-range `time_last_updated` falls back to `fetched_at`.
fn parse_latest_rates(
    body: &str,
    requested_base: &str,
    fetched_at: DateTime<Utc>,
) -> std::result::Result<RateSnapshot, String> {
    let data: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| format!("JSON parse error: {}", e))?;

    let last_updated = data
        .time_last_updated
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(fetched_at);

    Ok(RateSnapshot::new(
        data.base.unwrap_or_else(|| requested_base.to_string()),
        data.rates,
        last_updated,
    ))
}
