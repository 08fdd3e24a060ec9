//! Application layer: login, validated conversions and history access
//!
//! [`CurrencyApp`] is the composition root. It owns one conversion engine and
//! one history store and is handed to whatever front end drives it.

use crate::engine::ConversionEngine;
use crate::error::{FxError, Result};
use crate::history::HistoryStore;
use crate::rates::RateProvider;
use crate::storage::KeyValueStore;
use crate::types::{Conversion, CurrencyCode, Timestamp, User};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// A conversion as entered by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
}

impl ConversionRequest {
    /// Create a request; codes are upper-cased
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: from.trim().to_uppercase(),
            to: to.trim().to_uppercase(),
            amount,
        }
    }

    /// Reject non-positive amounts and identical currencies
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(FxError::InvalidAmount(self.amount));
        }
        if self.from.eq_ignore_ascii_case(&self.to) {
            return Err(FxError::SameCurrency(self.from.clone()));
        }
        Ok(())
    }

    /// Swap source and target currency
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

/// Issues time-derived ids that never repeat within a process
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the epoch at `now`, bumped past the last issued id if needed
    pub fn next_id(&self, now: Timestamp) -> String {
        let millis = now.timestamp_millis();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = millis.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}

/// Currency converter with a local user and a persisted history
#[derive(Debug)]
pub struct CurrencyApp<P, S> {
    engine: ConversionEngine<P>,
    history: HistoryStore<S>,
    ids: IdGenerator,
}

impl<P: RateProvider, S: KeyValueStore> CurrencyApp<P, S> {
    /// Wire a provider and a store together
    pub fn new(provider: P, store: S) -> Self {
        Self {
            engine: ConversionEngine::new(provider),
            history: HistoryStore::new(store),
            ids: IdGenerator::new(),
        }
    }

    /// The conversion engine
    pub fn engine(&self) -> &ConversionEngine<P> {
        &self.engine
    }

    /// The history store
    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Log in locally; both fields must be non-blank
    pub async fn login(&self, username: &str, email: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(FxError::InvalidUser("username is required".to_string()));
        }
        if email.is_empty() {
            return Err(FxError::InvalidUser("email is required".to_string()));
        }

        let user = User::new(username, email);
        self.history.save_user(&user).await?;
        log::info!("Logged in as {}", user.username);
        Ok(user)
    }

    /// Forget the logged-in user; the history is kept
    pub async fn logout(&self) -> Result<()> {
        self.history.remove_user().await
    }

    /// The logged-in user, if any
    pub async fn current_user(&self) -> Option<User> {
        self.history.get_user().await
    }

    /// True when a user is stored
    pub async fn is_logged_in(&self) -> bool {
        self.current_user().await.is_some()
    }

    /// Validate, convert and record `request`
    ///
    /// Nothing is saved when validation or the rate lookup fails, or when the
    /// result overflows.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<Conversion> {
        request.validate()?;

        let quote = self
            .engine
            .convert(&request.from, &request.to, request.amount)
            .await?;
        if !quote.result.is_finite() {
            return Err(FxError::ResultOutOfRange {
                amount: request.amount,
                from: request.from.clone(),
                to: request.to.clone(),
            });
        }

        let now = Utc::now();
        let conversion = Conversion::new(
            self.ids.next_id(now),
            request.from.clone(),
            request.to.clone(),
            request.amount,
            quote,
            now,
        );
        self.history.save_conversion(&conversion).await?;
        Ok(conversion)
    }

    /// Past conversions, newest first
    pub async fn history(&self) -> Vec<Conversion> {
        self.history.get_conversions().await
    }

    /// Delete all past conversions
    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear_conversions().await
    }
}
