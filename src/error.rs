//! Error types for rusty_fx

use thiserror::Error;

/// Main error type for rusty_fx
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Exchange rates unavailable for {base}: {reason}")]
    RatesUnavailable { base: String, reason: String },

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("Invalid amount: {0} (must be a positive number)")]
    InvalidAmount(f64),

    #[error("Source and target currency must differ, got {0} for both")]
    SameCurrency(String),

    #[error("Converting {amount} {from} to {to} gives a result out of range")]
    ResultOutOfRange { amount: f64, from: String, to: String },

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Storage error on key {key}: {reason}")]
    Storage { key: String, reason: String },

    #[error("Corrupt value under key {key}: {reason}")]
    CorruptData { key: String, reason: String },

    #[error("Unsupported schema version {found} under key {key} (newest known: {supported})")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl FxError {
    /// Build a storage error for `key`
    pub fn storage(key: &str, reason: impl std::fmt::Display) -> Self {
        FxError::Storage {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a rates-unavailable error for `base`
    pub fn rates_unavailable(base: &str, reason: impl std::fmt::Display) -> Self {
        FxError::RatesUnavailable {
            base: base.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for errors raised while reading a value that exists but cannot be decoded
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FxError::CorruptData { .. } | FxError::UnsupportedVersion { .. }
        )
    }
}

/// Result type alias for rusty_fx operations
pub type Result<T> = std::result::Result<T, FxError>;
