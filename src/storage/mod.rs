//! Key-value persistence layer
//!
//! # Components
//!
//! - **memory**: process-local store, for tests and throwaway sessions
//! - **file**: one file per key, atomically replaced on write
//! - **sqlite**: single-table SQLite store (feature `rusqlite-support`)
//! - **envelope**: versioned JSON framing for stored values

pub mod envelope;
pub mod file;
pub mod memory;
#[cfg(feature = "rusqlite-support")]
pub mod sqlite;

pub use envelope::{decode, encode, SCHEMA_VERSION};
pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "rusqlite-support")]
pub use sqlite::SqliteStore;

use crate::error::Result;
use std::future::Future;

/// Asynchronous string-keyed, string-valued durable store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when unset
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;

    /// Delete `key`; deleting an unset key succeeds
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).remove(key)
    }
}
