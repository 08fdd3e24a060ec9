//! # rusty_fx
//!
//! Currency conversion with live exchange rates and a locally persisted
//! conversion history.
//!
//! - [`rates`]: where exchange rates come from
//! - [`engine`]: turns an amount and two currencies into a quote
//! - [`history`]: the logged-in user and past conversions, on top of a
//!   [`storage::KeyValueStore`]
//! - [`app`]: wires the pieces together behind input validation
//!
//! ## Example
//!
//! ```rust
//! use rusty_fx::prelude::*;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = InMemoryRateProvider::new("USD").with_rate("EUR", 0.9);
//! let app = CurrencyApp::new(provider, MemoryStore::new());
//!
//! app.login("ana", "ana@example.com").await.unwrap();
//! let conversion = app
//!     .convert(&ConversionRequest::new("USD", "EUR", 100.0))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(rusty_fx::format::format_amount(conversion.result), "90.00");
//! assert_eq!(app.history().await.len(), 1);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod format;
pub mod history;
pub mod rates;
pub mod storage;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::app::{ConversionRequest, CurrencyApp};
    pub use crate::config::{Config, StorageBackend};
    pub use crate::currency::Currency;
    pub use crate::engine::ConversionEngine;
    pub use crate::error::{FxError, Result};
    pub use crate::history::HistoryStore;
    pub use crate::rates::{ExchangeRateApiProvider, InMemoryRateProvider, RateProvider};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    #[cfg(feature = "rusqlite-support")]
    pub use crate::storage::SqliteStore;
    pub use crate::types::*;
}
