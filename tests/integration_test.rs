//! End-to-end tests: app layer over in-memory rates and on-disk stores

use approx::assert_relative_eq;
use chrono::Utc;
use rusty_fx::app::{ConversionRequest, CurrencyApp};
use rusty_fx::error::FxError;
use rusty_fx::history::{HistoryStore, CONVERSIONS_KEY, USER_KEY};
use rusty_fx::rates::InMemoryRateProvider;
use rusty_fx::storage::{FileStore, KeyValueStore, MemoryStore};
use rusty_fx::types::{Conversion, ConversionQuote, User};
use tempfile::tempdir;

fn rates() -> InMemoryRateProvider {
    InMemoryRateProvider::new("USD")
        .with_rate("EUR", 0.9)
        .with_rate("PYG", 7300.0)
        .with_rate("BRL", 5.0)
}

fn record(id: &str) -> Conversion {
    Conversion::new(
        id,
        "USD",
        "EUR",
        1.0,
        ConversionQuote {
            result: 0.9,
            rate: 0.9,
        },
        Utc::now(),
    )
}

#[tokio::test]
async fn test_usd_to_eur_scenario() {
    let app = CurrencyApp::new(rates(), MemoryStore::new());
    app.login("ana", "ana@example.com").await.unwrap();

    let conversion = app
        .convert(&ConversionRequest::new("USD", "EUR", 100.0))
        .await
        .unwrap();

    assert_relative_eq!(conversion.result, 90.0);
    assert_relative_eq!(conversion.rate, 0.9);
    assert_eq!(conversion.from, "USD");
    assert_eq!(conversion.to, "EUR");
    assert_relative_eq!(conversion.result, conversion.amount * conversion.rate);
}

#[tokio::test]
async fn test_unknown_currency_saves_nothing() {
    let app = CurrencyApp::new(rates(), MemoryStore::new());

    let err = app
        .convert(&ConversionRequest::new("USD", "XYZ", 50.0))
        .await
        .unwrap_err();
    assert!(matches!(err, FxError::CurrencyNotFound(ref code) if code == "XYZ"));
    assert!(app.history().await.is_empty());
    assert!(app.history_store().store().raw(CONVERSIONS_KEY).is_none());
}

#[tokio::test]
async fn test_overflowing_result_keeps_existing_history() {
    let app = CurrencyApp::new(rates(), MemoryStore::new());
    let kept = app
        .convert(&ConversionRequest::new("USD", "EUR", 100.0))
        .await
        .unwrap();

    let err = app
        .convert(&ConversionRequest::new("USD", "PYG", 1e305))
        .await
        .unwrap_err();
    assert!(matches!(err, FxError::ResultOutOfRange { ref to, .. } if to == "PYG"));

    assert_eq!(app.history().await.len(), 1);
    assert_eq!(
        app.history_store().load_conversions().await.unwrap(),
        vec![kept]
    );
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let app = CurrencyApp::new(rates(), MemoryStore::new());

    let a = app
        .convert(&ConversionRequest::new("USD", "EUR", 10.0))
        .await
        .unwrap();
    let b = app
        .convert(&ConversionRequest::new("USD", "PYG", 20.0))
        .await
        .unwrap();

    let history = app.history().await;
    assert_eq!(history, vec![b.clone(), a.clone()]);
    assert!(b.id.parse::<i64>().unwrap() > a.id.parse::<i64>().unwrap());

    app.clear_history().await.unwrap();
    assert!(app.history().await.is_empty());
}

#[tokio::test]
async fn test_history_survives_restart_with_file_store() {
    let dir = tempdir().unwrap();

    let saved = {
        let app = CurrencyApp::new(rates(), FileStore::open(dir.path()).unwrap());
        app.login("ana", "ana@example.com").await.unwrap();
        app.convert(&ConversionRequest::new("BRL", "USD", 50.0))
            .await
            .unwrap()
    };

    let app = CurrencyApp::new(rates(), FileStore::open(dir.path()).unwrap());
    assert_eq!(
        app.current_user().await,
        Some(User::new("ana", "ana@example.com"))
    );
    let history = app.history().await;
    assert_eq!(history, vec![saved]);
    assert_relative_eq!(history[0].result, 10.0);

    // logging out keeps the history
    app.logout().await.unwrap();
    assert!(!app.is_logged_in().await);
    assert_eq!(app.history().await.len(), 1);
}

#[cfg(feature = "rusqlite-support")]
#[tokio::test]
async fn test_history_with_sqlite_store() {
    use rusty_fx::storage::SqliteStore;

    let dir = tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let history = HistoryStore::new(SqliteStore::open(&path).unwrap());
        history.save_conversion(&record("1")).await.unwrap();
        history.save_conversion(&record("2")).await.unwrap();
    }

    let history = HistoryStore::new(SqliteStore::open(&path).unwrap());
    let ids: Vec<String> = history
        .get_conversions()
        .await
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["2".to_string(), "1".to_string()]);
}

#[tokio::test]
async fn test_corrupt_files_read_as_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    std::fs::write(store.path_for(USER_KEY), "{\"username\": tru").unwrap();
    std::fs::write(store.path_for(CONVERSIONS_KEY), "[{]").unwrap();

    let history = HistoryStore::new(store);
    assert_eq!(history.get_user().await, None);
    assert!(history.get_conversions().await.is_empty());

    assert!(history.load_user().await.unwrap_err().is_corruption());
    assert!(history.load_conversions().await.unwrap_err().is_corruption());
}

#[tokio::test]
async fn test_absent_and_corrupt_user_are_indistinguishable() {
    let empty = HistoryStore::new(MemoryStore::new());

    let corrupt_store = MemoryStore::new();
    corrupt_store
        .set(USER_KEY, "][".to_string())
        .await
        .unwrap();
    let corrupt = HistoryStore::new(corrupt_store);

    assert_eq!(empty.get_user().await, corrupt.get_user().await);
    assert_eq!(empty.load_user().await.unwrap(), None);
    assert!(corrupt.load_user().await.is_err());
}

#[tokio::test]
async fn test_newer_schema_is_reported() {
    let store = MemoryStore::new();
    store
        .set(CONVERSIONS_KEY, r#"{"version":99,"data":[]}"#.to_string())
        .await
        .unwrap();
    let history = HistoryStore::new(store);

    let err = history.load_conversions().await.unwrap_err();
    assert!(matches!(err, FxError::UnsupportedVersion { found: 99, .. }));
    assert!(history.get_conversions().await.is_empty());
}

#[tokio::test]
async fn test_same_currency_passthrough_in_engine_only() {
    let app = CurrencyApp::new(rates(), MemoryStore::new());

    let quote = app.engine().convert("USD", "USD", 10.0).await.unwrap();
    assert_eq!(quote.result, 10.0);
    assert_eq!(quote.rate, 1.0);

    let err = app
        .convert(&ConversionRequest::new("USD", "USD", 10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, FxError::SameCurrency(_)));
}

#[tokio::test]
async fn test_concurrent_conversions_are_all_recorded() {
    let dir = tempdir().unwrap();
    let app = std::sync::Arc::new(CurrencyApp::new(
        rates(),
        FileStore::open(dir.path()).unwrap(),
    ));

    let mut handles = Vec::new();
    for i in 1..=10 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.convert(&ConversionRequest::new("USD", "EUR", i as f64))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = app.history().await;
    assert_eq!(history.len(), 10);
    let mut ids: Vec<&str> = history.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}
