//! Conversion history and logged-in user persistence
//!
//! Two logical collections live in the key-value store: the user singleton
//! and the newest-first list of conversions. Each is stored as a single
//! enveloped JSON value (see [`crate::storage::envelope`]).
//!
//! Reads come in two flavours. The `load_*` methods report every failure,
//! telling "nothing stored" (`Ok(None)` / empty list) apart from read errors
//! and corrupt data. The `get_*` methods treat any failure as "nothing
//! stored" and only log it. Writes and deletes always report failures.

use crate::error::{FxError, Result};
use crate::storage::{envelope, KeyValueStore, SCHEMA_VERSION};
use crate::types::{Conversion, User};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

/// Key of the logged-in user record
pub const USER_KEY: &str = "@currency_app_user";

/// Key of the conversion list
pub const CONVERSIONS_KEY: &str = "@currency_app_conversions";

/// Persistent store for the user and the conversion history
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    /// Serializes read-modify-write cycles on the conversion list
    list_lock: Mutex<()>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Create a history store over `store`
    pub fn new(store: S) -> Self {
        Self {
            store,
            list_lock: Mutex::new(()),
        }
    }

    /// The underlying key-value store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== User ==========

    /// Persist `user`, replacing any previous one
    pub async fn save_user(&self, user: &User) -> Result<()> {
        self.store.set(USER_KEY, envelope::encode(user)?).await
    }

    /// Stored user; read errors and corrupt data are reported
    pub async fn load_user(&self) -> Result<Option<User>> {
        self.load(USER_KEY).await
    }

    /// Stored user, or `None` when absent, unreadable or corrupt
    pub async fn get_user(&self) -> Option<User> {
        match self.load_user().await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Error getting user: {}", e);
                None
            }
        }
    }

    /// Forget the stored user
    pub async fn remove_user(&self) -> Result<()> {
        self.store.remove(USER_KEY).await
    }

    // ========== Conversions ==========

    /// Prepend `conversion` to the stored history
    ///
    /// An unreadable or corrupt list is replaced by a list holding only
    /// `conversion`. Concurrent calls on the same store are serialized, so no
    /// record is lost. Records with non-finite numbers are refused and the
    /// stored list is left untouched.
    pub async fn save_conversion(&self, conversion: &Conversion) -> Result<()> {
        if !conversion.is_finite() {
            return Err(FxError::ResultOutOfRange {
                amount: conversion.amount,
                from: conversion.from.clone(),
                to: conversion.to.clone(),
            });
        }

        let _guard = self.list_lock.lock().await;

        let mut conversions = self.get_conversions().await;
        conversions.insert(0, conversion.clone());
        self.store
            .set(CONVERSIONS_KEY, envelope::encode(&conversions)?)
            .await
    }

    /// Stored history, newest first; read errors and corrupt data are reported
    pub async fn load_conversions(&self) -> Result<Vec<Conversion>> {
        Ok(self.load(CONVERSIONS_KEY).await?.unwrap_or_default())
    }

    /// Stored history, newest first, or empty when absent, unreadable or corrupt
    pub async fn get_conversions(&self) -> Vec<Conversion> {
        match self.load_conversions().await {
            Ok(conversions) => conversions,
            Err(e) => {
                log::warn!("Error getting conversions: {}", e);
                Vec::new()
            }
        }
    }

    /// Delete the whole history
    pub async fn clear_conversions(&self) -> Result<()> {
        let _guard = self.list_lock.lock().await;
        self.store.remove(CONVERSIONS_KEY).await
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        let (value, version) = envelope::decode(key, &raw)?;
        if version < SCHEMA_VERSION {
            log::debug!(
                "Read {} at schema version {}; it will be upgraded on next write",
                key,
                version
            );
        }
        Ok(Some(value))
    }
}
